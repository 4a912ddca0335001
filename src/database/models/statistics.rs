use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use super::application::VacationType;
use super::person::{Person, PersonBasedata};
use super::sick_note::SickNote;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationTypeDays {
    pub waiting_days: BigDecimal,
    pub allowed_days: BigDecimal,
}

/// Absence figures of one person inside a filter period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForLeaveStatistics {
    pub person: Person,
    pub basedata: Option<PersonBasedata>,
    /// Keyed by vacation type id; only active types appear.
    pub days_by_vacation_type: BTreeMap<i64, VacationTypeDays>,
    pub sick_days: BigDecimal,
    pub child_sick_days: BigDecimal,
    pub vacation_days_entitlement: Option<BigDecimal>,
    pub left_vacation_days: Option<BigDecimal>,
}

impl ApplicationForLeaveStatistics {
    pub fn new(person: Person, basedata: Option<PersonBasedata>, vacation_types: &[VacationType]) -> Self {
        Self {
            person,
            basedata,
            days_by_vacation_type: vacation_types
                .iter()
                .map(|vacation_type| (vacation_type.id, VacationTypeDays::default()))
                .collect(),
            sick_days: BigDecimal::zero(),
            child_sick_days: BigDecimal::zero(),
            vacation_days_entitlement: None,
            left_vacation_days: None,
        }
    }

    pub fn days_for(&self, vacation_type: &VacationType) -> Option<&VacationTypeDays> {
        self.days_by_vacation_type.get(&vacation_type.id)
    }

    pub fn total_waiting_days(&self) -> BigDecimal {
        self.days_by_vacation_type
            .values()
            .fold(BigDecimal::zero(), |sum, days| sum + &days.waiting_days)
    }

    pub fn total_allowed_days(&self) -> BigDecimal {
        self.days_by_vacation_type
            .values()
            .fold(BigDecimal::zero(), |sum, days| sum + &days.allowed_days)
    }

    pub fn personnel_number(&self) -> Option<&str> {
        self.basedata
            .as_ref()
            .map(|basedata| basedata.personnel_number.as_str())
    }
}

/// Sick notes of one person inside a filter period, as shown in the detailed export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SickDaysDetailedStatistics {
    pub personnel_number: String,
    pub person: Person,
    pub sick_notes: Vec<SickNote>,
    pub departments: Vec<String>,
}
