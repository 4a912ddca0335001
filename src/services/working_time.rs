use std::sync::Arc;

use chrono::{NaiveDate, Weekday};

use crate::clock::Clock;
use crate::config::WorkingTimeProperties;
use crate::database::models::{
    format_date, weekday_from_iso, DayLength, FederalState, Person, WorkingTime,
};
use crate::database::repositories::WorkingTimeRepository;
use crate::error::AppResult;
use crate::services::settings::SettingsService;

/// Resolves and maintains the effective-dated working times of persons.
#[derive(Clone)]
pub struct WorkingTimeService {
    repository: Arc<dyn WorkingTimeRepository>,
    settings_service: SettingsService,
    properties: WorkingTimeProperties,
    clock: Arc<dyn Clock>,
}

impl WorkingTimeService {
    pub fn new(
        repository: Arc<dyn WorkingTimeRepository>,
        settings_service: SettingsService,
        properties: WorkingTimeProperties,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            settings_service,
            properties,
            clock,
        }
    }

    /// Replaces the week of the entry starting exactly at `valid_from`, creating
    /// it if needed. Every day is reset to ZERO before the listed ISO days
    /// (1 = Monday .. 7 = Sunday) are set to FULL; the override is replaced as
    /// given, so `None` clears it.
    pub async fn touch(
        &self,
        working_days: &[u8],
        valid_from: NaiveDate,
        person: &Person,
        federal_state: Option<FederalState>,
    ) -> AppResult<WorkingTime> {
        let weekdays = working_days
            .iter()
            .map(|day| weekday_from_iso(*day))
            .collect::<AppResult<Vec<Weekday>>>()?;

        let mut working_time = self
            .repository
            .find_by_person_and_valid_from(person.id, valid_from)
            .await?
            .unwrap_or_else(|| WorkingTime::new(person.id, valid_from));

        working_time.reset_work_days();
        for weekday in weekdays {
            working_time.set_day_length_for(weekday, DayLength::Full);
        }
        working_time.federal_state_override = federal_state;

        let saved = self.repository.save(&working_time).await?;
        log::info!(
            "Created working time valid from {} with working days {:?} for person {}",
            format_date(saved.valid_from),
            saved.working_days(),
            person.id
        );

        Ok(saved)
    }

    /// All working times of the person, newest first.
    pub async fn get_by_person(&self, person: &Person) -> AppResult<Vec<WorkingTime>> {
        Ok(self.repository.find_by_person(person.id).await?)
    }

    pub async fn get_by_persons_and_date_interval(
        &self,
        persons: &[Person],
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<WorkingTime>> {
        let person_ids: Vec<_> = persons.iter().map(|person| person.id).collect();
        Ok(self
            .repository
            .find_by_persons_and_interval(&person_ids, start, end)
            .await?)
    }

    /// The working time in effect on `date`: the latest one with `valid_from <= date`.
    pub async fn resolve(&self, person: &Person, date: NaiveDate) -> AppResult<Option<WorkingTime>> {
        Ok(self.repository.find_effective_at(person.id, date).await?)
    }

    /// Override of the working time in effect on `date`, else the system default.
    pub async fn federal_state_for(&self, person: &Person, date: NaiveDate) -> AppResult<FederalState> {
        match self.resolve(person, date).await? {
            Some(working_time) => match working_time.federal_state_override {
                Some(federal_state) => Ok(federal_state),
                None => self.system_default_federal_state().await,
            },
            None => {
                log::debug!(
                    "No working time found for person {} on or before {}, using system federal state as fallback",
                    person.id,
                    format_date(date)
                );
                self.system_default_federal_state().await
            }
        }
    }

    pub async fn system_default_federal_state(&self) -> AppResult<FederalState> {
        Ok(self
            .settings_service
            .get_settings()
            .await?
            .working_time_settings
            .federal_state)
    }

    /// Provisions a working time starting today. The days come from the
    /// settings when the configured defaults are deactivated, otherwise from
    /// the configured list; the two sources are never merged.
    ///
    /// Called by whatever provisions new persons.
    pub async fn create_default_working_time(&self, person: &Person) -> AppResult<WorkingTime> {
        let default_working_days = if self.properties.default_working_days_deactivated {
            self.settings_service
                .get_settings()
                .await?
                .working_time_settings
                .working_days
        } else {
            self.properties.default_working_days.clone()
        };

        let today = self.clock.today();
        self.touch(&default_working_days, today, person, None).await
    }
}
