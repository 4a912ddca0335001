use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};

use crate::database::models::{
    ApplicationForLeaveStatistics, FilterPeriod, Person, PersonId, SickDaysDetailedStatistics,
    SickNote, SickNoteCategory, SickNoteStatus, VacationCategory, VacationType,
};
use crate::database::repositories::{AccountRepository, ApplicationRepository, VacationTypeRepository};
use crate::error::{AppError, AppResult};
use crate::services::person::{DepartmentService, PersonBasedataService, PersonService};
use crate::services::sick_note::SickNoteService;

/// Builds the per-person leave figures shown in the application statistics.
#[derive(Clone)]
pub struct ApplicationForLeaveStatisticsService {
    person_service: PersonService,
    basedata_service: PersonBasedataService,
    sick_note_service: SickNoteService,
    vacation_type_repository: Arc<dyn VacationTypeRepository>,
    application_repository: Arc<dyn ApplicationRepository>,
    account_repository: Arc<dyn AccountRepository>,
}

impl ApplicationForLeaveStatisticsService {
    pub fn new(
        person_service: PersonService,
        basedata_service: PersonBasedataService,
        sick_note_service: SickNoteService,
        vacation_type_repository: Arc<dyn VacationTypeRepository>,
        application_repository: Arc<dyn ApplicationRepository>,
        account_repository: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            person_service,
            basedata_service,
            sick_note_service,
            vacation_type_repository,
            application_repository,
            account_repository,
        }
    }

    pub async fn get_active_vacation_types(&self) -> AppResult<Vec<VacationType>> {
        Ok(self.vacation_type_repository.find_active().await?)
    }

    /// One entry per person the signed-in person may see, in selection order.
    pub async fn get_statistics(
        &self,
        signed_in: &Person,
        filter_period: &FilterPeriod,
    ) -> AppResult<Vec<ApplicationForLeaveStatistics>> {
        let vacation_types = self.get_active_vacation_types().await?;
        let persons = self.person_service.relevant_persons_for(signed_in).await?;

        log::debug!(
            "Building application statistics of {} persons from {} to {}",
            persons.len(),
            filter_period.start_date_formatted(),
            filter_period.end_date_formatted()
        );

        let mut statistics = Vec::with_capacity(persons.len());
        for person in persons {
            statistics.push(self.build(person, filter_period, &vacation_types).await?);
        }

        Ok(statistics)
    }

    async fn build(
        &self,
        person: Person,
        filter_period: &FilterPeriod,
        vacation_types: &[VacationType],
    ) -> AppResult<ApplicationForLeaveStatistics> {
        let (from, to) = (filter_period.start_date(), filter_period.end_date());
        let basedata = self.basedata_service.get_basedata_by_person_id(person.id).await?;
        let mut statistics = ApplicationForLeaveStatistics::new(person, basedata, vacation_types);

        let applications = self
            .application_repository
            .find_by_person_and_period(statistics.person.id, from, to)
            .await?;
        for application in applications {
            let Some(days) = statistics
                .days_by_vacation_type
                .get_mut(&application.vacation_type.id)
            else {
                continue;
            };

            let days_in_period = application.period.days_in(from, to);
            if application.status.is_waiting() {
                days.waiting_days += days_in_period;
            } else if application.status.is_allowed() {
                days.allowed_days += days_in_period;
            }
        }

        let sick_notes = self
            .sick_note_service
            .get_by_person_and_period(&statistics.person, from, to)
            .await?;
        for sick_note in sick_notes.iter().filter(|note| note.is_active()) {
            let sick_days = sick_note.period().days_in(from, to);
            match sick_note.sick_note_type().category {
                SickNoteCategory::SickNote => statistics.sick_days += sick_days,
                SickNoteCategory::SickNoteChild => statistics.child_sick_days += sick_days,
            }
        }

        let year = from.year();
        if let Some(account) = self
            .account_repository
            .find_by_person_and_year(statistics.person.id, year)
            .await?
        {
            let entitlement = account.entitlement();
            let used = self.used_holiday_days(statistics.person.id, year).await?;
            statistics.left_vacation_days = Some(&entitlement - used);
            statistics.vacation_days_entitlement = Some(entitlement);
        }

        Ok(statistics)
    }

    /// Waiting and allowed HOLIDAY days inside the calendar year.
    async fn used_holiday_days(&self, person_id: PersonId, year: i32) -> AppResult<BigDecimal> {
        let first_day = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::invalid_argument(format!("Year {} is out of range", year)))?;
        let last_day = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::invalid_argument(format!("Year {} is out of range", year)))?;

        Ok(self
            .application_repository
            .find_by_person_and_period(person_id, first_day, last_day)
            .await?
            .iter()
            .filter(|application| application.vacation_type.category == VacationCategory::Holiday)
            .filter(|application| application.status.is_waiting() || application.status.is_allowed())
            .fold(BigDecimal::zero(), |sum, application| {
                sum + application.period.days_in(first_day, last_day)
            }))
    }
}

/// Lists the active sick notes per person for the detailed sick days export.
#[derive(Clone)]
pub struct SickDaysStatisticsService {
    person_service: PersonService,
    basedata_service: PersonBasedataService,
    department_service: DepartmentService,
    sick_note_service: SickNoteService,
}

impl SickDaysStatisticsService {
    pub fn new(
        person_service: PersonService,
        basedata_service: PersonBasedataService,
        department_service: DepartmentService,
        sick_note_service: SickNoteService,
    ) -> Self {
        Self {
            person_service,
            basedata_service,
            department_service,
            sick_note_service,
        }
    }

    pub async fn get_all(
        &self,
        signed_in: &Person,
        filter_period: &FilterPeriod,
    ) -> AppResult<Vec<SickDaysDetailedStatistics>> {
        let persons = self.person_service.relevant_persons_for(signed_in).await?;

        let mut notes_by_person: HashMap<PersonId, Vec<SickNote>> = HashMap::new();
        for sick_note in self
            .sick_note_service
            .get_for_states_and_person(
                &[SickNoteStatus::Active],
                &persons,
                filter_period.start_date(),
                filter_period.end_date(),
            )
            .await?
        {
            notes_by_person
                .entry(sick_note.person_id())
                .or_default()
                .push(sick_note);
        }

        let mut statistics = Vec::with_capacity(persons.len());
        for person in persons {
            let personnel_number = self
                .basedata_service
                .get_basedata_by_person_id(person.id)
                .await?
                .map(|basedata| basedata.personnel_number)
                .unwrap_or_default();
            let departments = self.department_service.department_names_of(person.id).await?;
            let sick_notes = notes_by_person.remove(&person.id).unwrap_or_default();

            statistics.push(SickDaysDetailedStatistics {
                personnel_number,
                person,
                sick_notes,
                departments,
            });
        }

        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::database::memory::{
        InMemoryAccountRepository, InMemoryApplicationRepository, InMemoryDepartmentRepository,
        InMemoryPersonBasedataRepository, InMemoryPersonRepository, InMemorySettingsRepository,
        InMemorySickNoteRepository, InMemoryVacationTypeRepository,
    };
    use crate::database::models::{
        Account, Application, ApplicationStatus, DayLength, Department, Period, PersonBasedataInput,
        Role, SickNoteType,
    };
    use crate::database::repositories::{DepartmentRepository, PersonRepository};
    use crate::services::settings::SettingsService;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    fn person(id: PersonId, roles: Vec<Role>) -> Person {
        Person {
            id,
            username: format!("user{}", id),
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("user{}@example.org", id),
            roles,
        }
    }

    fn vacation_type(id: i64, category: VacationCategory, active: bool) -> VacationType {
        VacationType {
            id,
            active,
            category,
            message_key: format!("application.data.vacationType.{}", category),
            requires_approval: true,
        }
    }

    fn sick_note_type(category: SickNoteCategory) -> SickNoteType {
        let (id, key) = match category {
            SickNoteCategory::SickNote => (1, "application.data.sicknotetype.sicknote"),
            SickNoteCategory::SickNoteChild => (2, "application.data.sicknotetype.sicknotechild"),
        };
        SickNoteType {
            id,
            category,
            message_key: key.to_string(),
        }
    }

    struct Fixture {
        office: Person,
        statistics: ApplicationForLeaveStatisticsService,
        sick_days: SickDaysStatisticsService,
        basedata: PersonBasedataService,
        sick_notes: SickNoteService,
        applications: Arc<InMemoryApplicationRepository>,
        accounts: Arc<InMemoryAccountRepository>,
    }

    async fn fixture() -> Fixture {
        let office = person(1, vec![Role::User, Role::Office]);
        let persons = Arc::new(InMemoryPersonRepository::new());
        persons.save(&office).await.unwrap();
        persons.save(&person(2, vec![Role::User])).await.unwrap();

        let departments = Arc::new(InMemoryDepartmentRepository::new());
        for (id, name) in [(1, "There"), (2, "Here")] {
            departments
                .save(&Department {
                    id,
                    name: name.to_string(),
                    member_ids: vec![2],
                    department_head_ids: vec![],
                    second_stage_authority_ids: vec![],
                })
                .await
                .unwrap();
        }

        let vacation_types = Arc::new(InMemoryVacationTypeRepository::new());
        vacation_types
            .save(&vacation_type(1000, VacationCategory::Holiday, true))
            .await
            .unwrap();
        vacation_types
            .save(&vacation_type(2000, VacationCategory::SpecialLeave, false))
            .await
            .unwrap();

        let settings = SettingsService::new(Arc::new(InMemorySettingsRepository::new()), 300);
        let sick_notes = SickNoteService::new(
            Arc::new(InMemorySickNoteRepository::new()),
            settings,
            Arc::new(FixedClock(date(2022, 6, 1))),
        );
        let department_service = DepartmentService::new(departments, persons.clone());
        let person_service = PersonService::new(persons, department_service.clone());
        let basedata = PersonBasedataService::new(Arc::new(InMemoryPersonBasedataRepository::new()));
        let applications = Arc::new(InMemoryApplicationRepository::new());
        let accounts = Arc::new(InMemoryAccountRepository::new());

        Fixture {
            office,
            statistics: ApplicationForLeaveStatisticsService::new(
                person_service.clone(),
                basedata.clone(),
                sick_notes.clone(),
                vacation_types,
                applications.clone(),
                accounts.clone(),
            ),
            sick_days: SickDaysStatisticsService::new(
                person_service,
                basedata.clone(),
                department_service,
                sick_notes.clone(),
            ),
            basedata,
            sick_notes,
            applications,
            accounts,
        }
    }

    fn application(
        id: i64,
        vacation_type: VacationType,
        start: NaiveDate,
        end: NaiveDate,
        status: ApplicationStatus,
    ) -> Application {
        Application {
            id,
            person_id: 2,
            vacation_type,
            period: Period::new(start, end, DayLength::Full).unwrap(),
            status,
        }
    }

    fn sick_note(category: SickNoteCategory, start: NaiveDate, end: NaiveDate, day_length: DayLength) -> SickNote {
        SickNote::builder()
            .person_id(2)
            .sick_note_type(sick_note_type(category))
            .start_date(start)
            .end_date(end)
            .day_length(day_length)
            .build()
            .unwrap()
    }

    fn find(statistics: &[ApplicationForLeaveStatistics], id: PersonId) -> &ApplicationForLeaveStatistics {
        statistics
            .iter()
            .find(|entry| entry.person.id == id)
            .unwrap()
    }

    #[tokio::test]
    async fn counts_days_inside_the_filter_period() {
        let fixture = fixture().await;
        let holiday = vacation_type(1000, VacationCategory::Holiday, true);
        fixture
            .applications
            .save(&application(1, holiday.clone(), date(2022, 1, 30), date(2022, 2, 3), ApplicationStatus::Allowed))
            .await
            .unwrap();
        fixture
            .applications
            .save(&application(2, holiday, date(2022, 2, 10), date(2022, 2, 11), ApplicationStatus::Waiting))
            .await
            .unwrap();
        fixture
            .sick_notes
            .save(&sick_note(SickNoteCategory::SickNote, date(2022, 2, 14), date(2022, 2, 14), DayLength::Morning))
            .await
            .unwrap();
        fixture
            .sick_notes
            .save(&sick_note(SickNoteCategory::SickNoteChild, date(2022, 2, 27), date(2022, 3, 2), DayLength::Full))
            .await
            .unwrap();

        let period = FilterPeriod::new(date(2022, 2, 1), date(2022, 2, 28)).unwrap();
        let statistics = fixture.statistics.get_statistics(&fixture.office, &period).await.unwrap();

        assert_eq!(statistics.len(), 2);
        let entry = find(&statistics, 2);
        let holiday_days = &entry.days_by_vacation_type[&1000];
        assert_eq!(holiday_days.allowed_days, days(3));
        assert_eq!(holiday_days.waiting_days, days(2));
        assert_eq!(entry.sick_days, BigDecimal::new(5.into(), 1));
        assert_eq!(entry.child_sick_days, days(2));
        assert_eq!(entry.basedata, None);
        assert_eq!(entry.vacation_days_entitlement, None);
        assert_eq!(entry.left_vacation_days, None);
    }

    #[tokio::test]
    async fn inactive_vacation_types_are_not_counted() {
        let fixture = fixture().await;
        fixture
            .applications
            .save(&application(
                1,
                vacation_type(2000, VacationCategory::SpecialLeave, false),
                date(2022, 2, 1),
                date(2022, 2, 4),
                ApplicationStatus::Allowed,
            ))
            .await
            .unwrap();

        let period = FilterPeriod::new(date(2022, 1, 1), date(2022, 12, 31)).unwrap();
        let statistics = fixture.statistics.get_statistics(&fixture.office, &period).await.unwrap();

        let entry = find(&statistics, 2);
        assert!(!entry.days_by_vacation_type.contains_key(&2000));
        assert_eq!(entry.total_allowed_days(), BigDecimal::zero());
    }

    #[tokio::test]
    async fn left_days_subtract_holidays_of_the_whole_year() {
        let fixture = fixture().await;
        let holiday = vacation_type(1000, VacationCategory::Holiday, true);
        fixture
            .accounts
            .save(&Account {
                person_id: 2,
                year: 2022,
                annual_vacation_days: days(30),
                remaining_vacation_days: days(5),
            })
            .await
            .unwrap();
        fixture
            .applications
            .save(&application(1, holiday.clone(), date(2022, 3, 1), date(2022, 3, 10), ApplicationStatus::Allowed))
            .await
            .unwrap();
        fixture
            .applications
            .save(&application(2, holiday.clone(), date(2022, 8, 1), date(2022, 8, 2), ApplicationStatus::Waiting))
            .await
            .unwrap();
        fixture
            .applications
            .save(&application(3, holiday, date(2022, 9, 1), date(2022, 9, 5), ApplicationStatus::Rejected))
            .await
            .unwrap();

        let period = FilterPeriod::new(date(2022, 3, 1), date(2022, 3, 31)).unwrap();
        let statistics = fixture.statistics.get_statistics(&fixture.office, &period).await.unwrap();

        let entry = find(&statistics, 2);
        assert_eq!(entry.vacation_days_entitlement, Some(days(35)));
        assert_eq!(entry.left_vacation_days, Some(days(23)));
    }

    #[tokio::test]
    async fn basedata_is_included_when_present() {
        let fixture = fixture().await;
        fixture
            .basedata
            .update(
                2,
                PersonBasedataInput {
                    personnel_number: Some("42".to_string()),
                    additional_information: None,
                },
            )
            .await
            .unwrap();

        let period = FilterPeriod::new(date(2022, 1, 1), date(2022, 12, 31)).unwrap();
        let statistics = fixture.statistics.get_statistics(&fixture.office, &period).await.unwrap();

        assert_eq!(find(&statistics, 2).personnel_number(), Some("42"));
        assert_eq!(find(&statistics, 1).personnel_number(), None);
    }

    #[tokio::test]
    async fn sick_days_statistics_list_active_notes_with_departments() {
        let fixture = fixture().await;
        fixture
            .sick_notes
            .save(&sick_note(SickNoteCategory::SickNote, date(2022, 1, 1), date(2022, 1, 2), DayLength::Full))
            .await
            .unwrap();
        let cancelled = sick_note(SickNoteCategory::SickNote, date(2022, 1, 10), date(2022, 1, 12), DayLength::Full)
            .to_builder()
            .status(SickNoteStatus::Cancelled)
            .build()
            .unwrap();
        fixture.sick_notes.save(&cancelled).await.unwrap();

        let period = FilterPeriod::new(date(2022, 1, 1), date(2022, 12, 31)).unwrap();
        let statistics = fixture.sick_days.get_all(&fixture.office, &period).await.unwrap();

        let entry = statistics.iter().find(|entry| entry.person.id == 2).unwrap();
        assert_eq!(entry.personnel_number, "");
        assert_eq!(entry.departments, vec!["Here".to_string(), "There".to_string()]);
        assert_eq!(entry.sick_notes.len(), 1);
        assert_eq!(entry.sick_notes[0].start_date(), date(2022, 1, 1));

        let office_entry = statistics.iter().find(|entry| entry.person.id == 1).unwrap();
        assert!(office_entry.sick_notes.is_empty());
    }
}
