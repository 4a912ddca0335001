use std::collections::HashSet;
use std::sync::Arc;

use crate::database::models::{
    Department, Person, PersonBasedata, PersonBasedataInput, PersonId, Role,
};
use crate::database::repositories::{
    DepartmentRepository, PersonBasedataRepository, PersonRepository,
};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
    department_service: DepartmentService,
}

impl PersonService {
    pub fn new(repository: Arc<dyn PersonRepository>, department_service: DepartmentService) -> Self {
        Self {
            repository,
            department_service,
        }
    }

    pub async fn get_by_id(&self, id: PersonId) -> AppResult<Option<Person>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Like [`Self::get_by_id`], but an unknown id is an error.
    pub async fn get_existing(&self, id: PersonId) -> AppResult<Person> {
        self.get_by_id(id)
            .await?
            .ok_or(AppError::UnknownPerson(id))
    }

    pub async fn get_active_persons(&self) -> AppResult<Vec<Person>> {
        Ok(self.repository.find_active().await?)
    }

    /// Persons whose absences the signed-in person may see.
    ///
    /// BOSS and OFFICE see every active person. Department heads and second
    /// stage authorities see the active members of their departments; both
    /// roles are evaluated and their results joined, each person once in
    /// first-seen order. Everybody else sees nobody.
    pub async fn relevant_persons_for(&self, signed_in: &Person) -> AppResult<Vec<Person>> {
        if signed_in.has_any_role(&[Role::Boss, Role::Office]) {
            return self.get_active_persons().await;
        }

        let mut candidates = Vec::new();
        if signed_in.has_role(Role::DepartmentHead) {
            candidates.extend(
                self.department_service
                    .members_for_department_head(signed_in)
                    .await?,
            );
        }
        if signed_in.has_role(Role::SecondStageAuthority) {
            candidates.extend(
                self.department_service
                    .members_for_second_stage_authority(signed_in)
                    .await?,
            );
        }

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|person| person.is_active())
            .filter(|person| seen.insert(person.id))
            .collect())
    }
}

#[derive(Clone)]
pub struct DepartmentService {
    repository: Arc<dyn DepartmentRepository>,
    person_repository: Arc<dyn PersonRepository>,
}

impl DepartmentService {
    pub fn new(
        repository: Arc<dyn DepartmentRepository>,
        person_repository: Arc<dyn PersonRepository>,
    ) -> Self {
        Self {
            repository,
            person_repository,
        }
    }

    pub async fn get_departments_of_member(&self, person_id: PersonId) -> AppResult<Vec<Department>> {
        Ok(self.repository.find_by_member(person_id).await?)
    }

    pub async fn department_names_of(&self, person_id: PersonId) -> AppResult<Vec<String>> {
        Ok(self
            .get_departments_of_member(person_id)
            .await?
            .into_iter()
            .map(|department| department.name)
            .collect())
    }

    /// Members of all departments the person heads.
    pub async fn members_for_department_head(&self, head: &Person) -> AppResult<Vec<Person>> {
        let departments = self.repository.find_by_department_head(head.id).await?;
        self.members_of(&departments).await
    }

    /// Members of all departments the person is second stage authority of.
    pub async fn members_for_second_stage_authority(&self, authority: &Person) -> AppResult<Vec<Person>> {
        let departments = self
            .repository
            .find_by_second_stage_authority(authority.id)
            .await?;
        self.members_of(&departments).await
    }

    async fn members_of(&self, departments: &[Department]) -> AppResult<Vec<Person>> {
        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for member_id in departments.iter().flat_map(|department| &department.member_ids) {
            if !seen.insert(*member_id) {
                continue;
            }
            match self.person_repository.find_by_id(*member_id).await? {
                Some(person) => members.push(person),
                None => log::warn!("Department member {} does not exist", member_id),
            }
        }

        Ok(members)
    }
}

#[derive(Clone)]
pub struct PersonBasedataService {
    repository: Arc<dyn PersonBasedataRepository>,
}

impl PersonBasedataService {
    pub fn new(repository: Arc<dyn PersonBasedataRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_basedata_by_person_id(&self, person_id: PersonId) -> AppResult<Option<PersonBasedata>> {
        Ok(self.repository.find_by_person_id(person_id).await?)
    }

    pub async fn update(&self, person_id: PersonId, input: PersonBasedataInput) -> AppResult<PersonBasedata> {
        let basedata = PersonBasedata::new(
            person_id,
            input.personnel_number.unwrap_or_default(),
            input.additional_information.unwrap_or_default(),
        )?;

        let saved = self.repository.save(&basedata).await?;
        log::info!("Updated base data of person {}", person_id);

        Ok(saved)
    }
}
