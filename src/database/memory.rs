//! In-memory repositories, used by the test suite and for running the service
//! without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::database::{
    models::{
        Account, Application, ApplicationComment, Department, OvertimeComment, Person,
        PersonBasedata, PersonId, Settings, SickNote, SickNoteStatus, VacationType,
        WorkingTime, WorkingTimeHistory,
    },
    repositories::{
        AccountRepository, ApplicationRepository, CommentRepository, DepartmentRepository,
        PersonBasedataRepository, PersonRepository, SettingsRepository, SickNoteRepository,
        VacationTypeRepository, WorkingTimeRepository,
    },
    Repositories,
};

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| anyhow::anyhow!("Year {} is out of range", year))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| anyhow::anyhow!("Year {} is out of range", year))?;
    Ok((first, last))
}

#[derive(Default)]
pub struct InMemoryPersonRepository {
    persons: RwLock<BTreeMap<PersonId, Person>>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>> {
        Ok(self.persons.read().await.get(&id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<Person>> {
        let mut active: Vec<Person> = self
            .persons
            .read()
            .await
            .values()
            .filter(|person| person.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name))
        });
        Ok(active)
    }

    async fn save(&self, person: &Person) -> Result<Person> {
        self.persons.write().await.insert(person.id, person.clone());
        Ok(person.clone())
    }
}

#[derive(Default)]
pub struct InMemoryPersonBasedataRepository {
    basedata: RwLock<HashMap<PersonId, PersonBasedata>>,
}

impl InMemoryPersonBasedataRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonBasedataRepository for InMemoryPersonBasedataRepository {
    async fn find_by_person_id(&self, person_id: PersonId) -> Result<Option<PersonBasedata>> {
        Ok(self.basedata.read().await.get(&person_id).cloned())
    }

    async fn save(&self, basedata: &PersonBasedata) -> Result<PersonBasedata> {
        self.basedata
            .write()
            .await
            .insert(basedata.person_id, basedata.clone());
        Ok(basedata.clone())
    }
}

#[derive(Default)]
pub struct InMemoryDepartmentRepository {
    departments: RwLock<BTreeMap<i64, Department>>,
}

impl InMemoryDepartmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_matching(&self, matches: impl Fn(&Department) -> bool) -> Vec<Department> {
        let mut found: Vec<Department> = self
            .departments
            .read()
            .await
            .values()
            .filter(|department| matches(department))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn find_by_member(&self, person_id: PersonId) -> Result<Vec<Department>> {
        Ok(self
            .find_matching(|department| department.member_ids.contains(&person_id))
            .await)
    }

    async fn find_by_department_head(&self, person_id: PersonId) -> Result<Vec<Department>> {
        Ok(self
            .find_matching(|department| department.department_head_ids.contains(&person_id))
            .await)
    }

    async fn find_by_second_stage_authority(&self, person_id: PersonId) -> Result<Vec<Department>> {
        Ok(self
            .find_matching(|department| department.second_stage_authority_ids.contains(&person_id))
            .await)
    }

    async fn save(&self, department: &Department) -> Result<Department> {
        self.departments
            .write()
            .await
            .insert(department.id, department.clone());
        Ok(department.clone())
    }
}

/// Keeps one sorted [`WorkingTimeHistory`] per person.
#[derive(Default)]
pub struct InMemoryWorkingTimeRepository {
    histories: RwLock<HashMap<PersonId, WorkingTimeHistory>>,
}

impl InMemoryWorkingTimeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkingTimeRepository for InMemoryWorkingTimeRepository {
    async fn find_by_person_and_valid_from(
        &self,
        person_id: PersonId,
        valid_from: NaiveDate,
    ) -> Result<Option<WorkingTime>> {
        Ok(self
            .histories
            .read()
            .await
            .get(&person_id)
            .and_then(|history| history.find_exact(valid_from))
            .cloned())
    }

    async fn find_effective_at(&self, person_id: PersonId, date: NaiveDate) -> Result<Option<WorkingTime>> {
        Ok(self
            .histories
            .read()
            .await
            .get(&person_id)
            .and_then(|history| history.effective_at(date))
            .cloned())
    }

    async fn find_by_person(&self, person_id: PersonId) -> Result<Vec<WorkingTime>> {
        Ok(self
            .histories
            .read()
            .await
            .get(&person_id)
            .map(|history| history.entries().iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_persons_and_interval(
        &self,
        person_ids: &[PersonId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkingTime>> {
        let histories = self.histories.read().await;
        let mut found = Vec::new();
        for person_id in person_ids {
            if let Some(history) = histories.get(person_id) {
                found.extend(history.in_interval(start, end).into_iter().cloned());
            }
        }
        Ok(found)
    }

    async fn save(&self, working_time: &WorkingTime) -> Result<WorkingTime> {
        self.histories
            .write()
            .await
            .entry(working_time.person_id)
            .or_default()
            .upsert(working_time.clone());
        Ok(working_time.clone())
    }
}

#[derive(Default)]
struct SickNoteStore {
    next_id: i64,
    notes: BTreeMap<i64, SickNote>,
}

#[derive(Default)]
pub struct InMemorySickNoteRepository {
    store: RwLock<SickNoteStore>,
}

impl InMemorySickNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_matching(&self, matches: impl Fn(&SickNote) -> bool) -> Vec<SickNote> {
        let mut found: Vec<SickNote> = self
            .store
            .read()
            .await
            .notes
            .values()
            .filter(|note| matches(note))
            .cloned()
            .collect();
        found.sort_by_key(|note| (note.start_date(), note.id()));
        found
    }
}

#[async_trait]
impl SickNoteRepository for InMemorySickNoteRepository {
    async fn save(&self, sick_note: &SickNote) -> Result<SickNote> {
        let mut store = self.store.write().await;
        let id = match sick_note.id() {
            Some(id) => {
                store.next_id = store.next_id.max(id);
                id
            }
            None => {
                store.next_id += 1;
                store.next_id
            }
        };

        let saved = sick_note.clone().with_id(id);
        store.notes.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SickNote>> {
        Ok(self.store.read().await.notes.get(&id).cloned())
    }

    async fn find_by_person_and_period(
        &self,
        person_id: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SickNote>> {
        Ok(self
            .find_matching(|note| note.person_id() == person_id && note.period().overlaps(from, to))
            .await)
    }

    async fn find_by_period(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SickNote>> {
        Ok(self
            .find_matching(|note| note.period().overlaps(from, to))
            .await)
    }

    async fn find_active_without_end_of_sick_pay_notification(&self) -> Result<Vec<SickNote>> {
        Ok(self
            .find_matching(|note| note.is_active() && note.end_of_sick_pay_notification_send().is_none())
            .await)
    }

    async fn find_all_active_by_year(&self, year: i32) -> Result<Vec<SickNote>> {
        let (first, last) = year_bounds(year)?;
        Ok(self
            .find_matching(|note| note.is_active() && note.period().overlaps(first, last))
            .await)
    }

    async fn count_persons_with_active_sick_note(&self, year: i32) -> Result<i64> {
        let mut person_ids: Vec<PersonId> = self
            .find_all_active_by_year(year)
            .await?
            .iter()
            .map(SickNote::person_id)
            .collect();
        person_ids.sort_unstable();
        person_ids.dedup();
        Ok(person_ids.len() as i64)
    }

    async fn find_by_status_in_and_end_date_since(
        &self,
        statuses: &[SickNoteStatus],
        since: NaiveDate,
    ) -> Result<Vec<SickNote>> {
        Ok(self
            .find_matching(|note| statuses.contains(&note.status()) && note.end_date() >= since)
            .await)
    }

    async fn find_by_status_in_and_person_in_and_period(
        &self,
        statuses: &[SickNoteStatus],
        person_ids: &[PersonId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SickNote>> {
        let mut found = self
            .find_matching(|note| {
                statuses.contains(&note.status())
                    && person_ids.contains(&note.person_id())
                    && note.period().overlaps(start, end)
            })
            .await;
        found.sort_by_key(|note| (note.person_id(), note.start_date()));
        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryApplicationRepository {
    applications: RwLock<BTreeMap<i64, Application>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn find_by_person_and_period(
        &self,
        person_id: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Application>> {
        let mut found: Vec<Application> = self
            .applications
            .read()
            .await
            .values()
            .filter(|application| {
                application.person_id == person_id && application.period.overlaps(from, to)
            })
            .cloned()
            .collect();
        found.sort_by_key(|application| application.period.start_date());
        Ok(found)
    }

    async fn save(&self, application: &Application) -> Result<Application> {
        self.applications
            .write()
            .await
            .insert(application.id, application.clone());
        Ok(application.clone())
    }
}

#[derive(Default)]
pub struct InMemoryVacationTypeRepository {
    vacation_types: RwLock<BTreeMap<i64, VacationType>>,
}

impl InMemoryVacationTypeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VacationTypeRepository for InMemoryVacationTypeRepository {
    async fn find_all(&self) -> Result<Vec<VacationType>> {
        Ok(self.vacation_types.read().await.values().cloned().collect())
    }

    async fn find_active(&self) -> Result<Vec<VacationType>> {
        Ok(self
            .vacation_types
            .read()
            .await
            .values()
            .filter(|vacation_type| vacation_type.active)
            .cloned()
            .collect())
    }

    async fn save(&self, vacation_type: &VacationType) -> Result<VacationType> {
        self.vacation_types
            .write()
            .await
            .insert(vacation_type.id, vacation_type.clone());
        Ok(vacation_type.clone())
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<(PersonId, i32), Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_person_and_year(&self, person_id: PersonId, year: i32) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(&(person_id, year)).cloned())
    }

    async fn save(&self, account: &Account) -> Result<Account> {
        self.accounts
            .write()
            .await
            .insert((account.person_id, account.year), account.clone());
        Ok(account.clone())
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<Option<Settings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Option<Settings>> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &Settings) -> Result<Settings> {
        *self.settings.write().await = Some(settings.clone());
        Ok(settings.clone())
    }
}

#[derive(Default)]
struct CommentStore {
    next_id: i64,
    application_comments: Vec<ApplicationComment>,
    overtime_comments: Vec<OvertimeComment>,
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    store: RwLock<CommentStore>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn save_application_comment(&self, comment: &ApplicationComment) -> Result<ApplicationComment> {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let saved = ApplicationComment {
            id: Some(store.next_id),
            ..comment.clone()
        };
        store.application_comments.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_application(&self, application_id: i64) -> Result<Vec<ApplicationComment>> {
        Ok(self
            .store
            .read()
            .await
            .application_comments
            .iter()
            .filter(|comment| comment.subject_id == application_id)
            .cloned()
            .collect())
    }

    async fn save_overtime_comment(&self, comment: &OvertimeComment) -> Result<OvertimeComment> {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let saved = OvertimeComment {
            id: Some(store.next_id),
            ..comment.clone()
        };
        store.overtime_comments.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_overtime(&self, overtime_id: i64) -> Result<Vec<OvertimeComment>> {
        Ok(self
            .store
            .read()
            .await
            .overtime_comments
            .iter()
            .filter(|comment| comment.subject_id == overtime_id)
            .cloned()
            .collect())
    }
}

/// Concrete in-memory storage of every aggregate. Keeps the typed handles so
/// callers can seed data, and hands out the shared [`Repositories`].
#[derive(Clone, Default)]
pub struct InMemoryRepositories {
    pub persons: Arc<InMemoryPersonRepository>,
    pub basedata: Arc<InMemoryPersonBasedataRepository>,
    pub departments: Arc<InMemoryDepartmentRepository>,
    pub working_times: Arc<InMemoryWorkingTimeRepository>,
    pub sick_notes: Arc<InMemorySickNoteRepository>,
    pub applications: Arc<InMemoryApplicationRepository>,
    pub vacation_types: Arc<InMemoryVacationTypeRepository>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub settings: Arc<InMemorySettingsRepository>,
    pub comments: Arc<InMemoryCommentRepository>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            persons: self.persons.clone(),
            basedata: self.basedata.clone(),
            departments: self.departments.clone(),
            working_times: self.working_times.clone(),
            sick_notes: self.sick_notes.clone(),
            applications: self.applications.clone(),
            vacation_types: self.vacation_types.clone(),
            accounts: self.accounts.clone(),
            settings: self.settings.clone(),
            comments: self.comments.clone(),
        }
    }
}
