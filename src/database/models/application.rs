use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::period::{DayLength, Period};
use super::person::PersonId;
use crate::error::{AppError, AppResult};

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum VacationCategory {
        Holiday => "holiday",
        SpecialLeave => "specialleave",
        UnpaidLeave => "unpaidleave",
        Overtime => "overtime",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum ApplicationStatus {
        Waiting => "waiting",
        TemporaryAllowed => "temporary_allowed",
        Allowed => "allowed",
        AllowedCancellationRequested => "allowed_cancellation_requested",
        Rejected => "rejected",
        Cancelled => "cancelled",
        Revoked => "revoked",
    }
}

impl ApplicationStatus {
    /// Still awaiting a final decision.
    pub fn is_waiting(&self) -> bool {
        matches!(self, ApplicationStatus::Waiting | ApplicationStatus::TemporaryAllowed)
    }

    /// Granted, including those whose cancellation is pending.
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Allowed | ApplicationStatus::AllowedCancellationRequested
        )
    }
}

/// Category of leave that can be switched on and off by the office.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VacationType {
    pub id: i64,
    pub active: bool,
    pub category: VacationCategory,
    pub message_key: String,
    pub requires_approval: bool,
}

/// Application for leave.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub person_id: PersonId,
    pub vacation_type: VacationType,
    pub period: Period,
    pub status: ApplicationStatus,
}

// Joined row of applications and vacation_types.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub person_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_length: DayLength,
    pub status: ApplicationStatus,
    pub vacation_type_id: i64,
    pub vacation_type_active: bool,
    pub vacation_type_category: VacationCategory,
    pub vacation_type_message_key: String,
    pub vacation_type_requires_approval: bool,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            person_id: row.person_id,
            vacation_type: VacationType {
                id: row.vacation_type_id,
                active: row.vacation_type_active,
                category: row.vacation_type_category,
                message_key: row.vacation_type_message_key,
                requires_approval: row.vacation_type_requires_approval,
            },
            period: Period::new(row.start_date, row.end_date, row.day_length)?,
            status: row.status,
        })
    }
}

/// Yearly holiday entitlement of a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub person_id: PersonId,
    pub year: i32,
    pub annual_vacation_days: BigDecimal,
    pub remaining_vacation_days: BigDecimal,
}

impl Account {
    pub fn entitlement(&self) -> BigDecimal {
        &self.annual_vacation_days + &self.remaining_vacation_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_string_is_shared_by_serde_display_and_parsing() {
        let status = ApplicationStatus::AllowedCancellationRequested;

        assert_eq!(status.as_str(), "allowed_cancellation_requested");
        assert_eq!(status.to_string(), "allowed_cancellation_requested");
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            "\"allowed_cancellation_requested\""
        );
        assert_eq!(
            "ALLOWED_CANCELLATION_REQUESTED".parse::<ApplicationStatus>().unwrap(),
            status
        );
        assert!("approved".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn status_groups() {
        assert!(ApplicationStatus::Waiting.is_waiting());
        assert!(ApplicationStatus::TemporaryAllowed.is_waiting());
        assert!(ApplicationStatus::AllowedCancellationRequested.is_allowed());
        assert!(!ApplicationStatus::Rejected.is_allowed());
        assert!(!ApplicationStatus::Revoked.is_waiting());
    }

    #[test]
    fn entitlement_adds_carried_over_days() {
        let account = Account {
            person_id: 1,
            year: 2022,
            annual_vacation_days: BigDecimal::from(30),
            remaining_vacation_days: BigDecimal::new(55.into(), 1),
        };

        assert_eq!(account.entitlement(), BigDecimal::new(355.into(), 1));
    }

    #[test]
    fn row_with_inverted_dates_is_rejected() {
        let row = ApplicationRow {
            id: 1,
            person_id: 1,
            start_date: NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            day_length: DayLength::Full,
            status: ApplicationStatus::Allowed,
            vacation_type_id: 1,
            vacation_type_active: true,
            vacation_type_category: VacationCategory::Holiday,
            vacation_type_message_key: "application.data.vacationType.holiday".to_string(),
            vacation_type_requires_approval: true,
        };

        assert!(Application::try_from(row).is_err());
    }
}
