use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::error::{AppError, AppResult};

pub type PersonId = i64;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Role {
        User => "user",
        Inactive => "inactive",
        DepartmentHead => "department_head",
        SecondStageAuthority => "second_stage_authority",
        Boss => "boss",
        Office => "office",
        Admin => "admin",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Person {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn is_active(&self) -> bool {
        !self.has_role(Role::Inactive)
    }

    pub fn nice_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

// Database row; roles are a VARCHAR[] column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonRow {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        let roles = row
            .roles
            .iter()
            .filter_map(|role| match role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    log::warn!("Ignoring role of person {}: {}", row.id, err);
                    None
                }
            })
            .collect();

        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            roles,
        }
    }
}

pub const PERSONNEL_NUMBER_MAX_LENGTH: usize = 20;
pub const ADDITIONAL_INFORMATION_MAX_LENGTH: usize = 500;

/// Supplementary HR data of a person, maintained by the office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersonBasedata {
    pub person_id: PersonId,
    pub personnel_number: String,
    pub additional_information: String,
}

impl PersonBasedata {
    pub fn new(
        person_id: PersonId,
        personnel_number: impl Into<String>,
        additional_information: impl Into<String>,
    ) -> AppResult<Self> {
        let personnel_number = personnel_number.into().trim().to_string();
        let additional_information = additional_information.into();

        if personnel_number.chars().count() > PERSONNEL_NUMBER_MAX_LENGTH {
            return Err(AppError::invalid_argument(format!(
                "Personnel number must not exceed {} characters",
                PERSONNEL_NUMBER_MAX_LENGTH
            )));
        }

        if additional_information.chars().count() > ADDITIONAL_INFORMATION_MAX_LENGTH {
            return Err(AppError::invalid_argument(format!(
                "Additional information must not exceed {} characters",
                ADDITIONAL_INFORMATION_MAX_LENGTH
            )));
        }

        Ok(Self {
            person_id,
            personnel_number,
            additional_information,
        })
    }

    /// Placeholder shown for persons without stored base data.
    pub fn empty(person_id: PersonId) -> Self {
        Self {
            person_id,
            personnel_number: String::new(),
            additional_information: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBasedataInput {
    pub personnel_number: Option<String>,
    pub additional_information: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub member_ids: Vec<PersonId>,
    pub department_head_ids: Vec<PersonId>,
    pub second_stage_authority_ids: Vec<PersonId>,
}

impl Department {
    pub fn has_member(&self, person_id: PersonId) -> bool {
        self.member_ids.contains(&person_id)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
    pub member_ids: Vec<i64>,
    pub department_head_ids: Vec<i64>,
    pub second_stage_authority_ids: Vec<i64>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            member_ids: row.member_ids,
            department_head_ids: row.department_head_ids,
            second_stage_authority_ids: row.second_stage_authority_ids,
        }
    }
}
