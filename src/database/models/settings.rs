use serde::{Deserialize, Serialize};

use super::working_time::{weekday_from_iso, FederalState};
use crate::error::{AppError, AppResult};

pub const DEFAULT_MAXIMUM_SICK_PAY_DAYS: i32 = 42;
pub const DEFAULT_DAYS_BEFORE_END_OF_SICK_PAY_NOTIFICATION: i32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTimeSettings {
    pub federal_state: FederalState,
    /// ISO day numbers, 1 = Monday .. 7 = Sunday.
    pub working_days: Vec<u8>,
}

impl Default for WorkingTimeSettings {
    fn default() -> Self {
        Self {
            federal_state: FederalState::BadenWuerttemberg,
            working_days: vec![1, 2, 3, 4, 5],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickNoteSettings {
    pub maximum_sick_pay_days: i32,
    pub days_before_end_of_sick_pay_notification: i32,
}

impl SickNoteSettings {
    /// Number of sick days from which a note is due for the end-of-sick-pay notice.
    pub fn notification_threshold(&self) -> i32 {
        self.maximum_sick_pay_days - self.days_before_end_of_sick_pay_notification
    }
}

impl Default for SickNoteSettings {
    fn default() -> Self {
        Self {
            maximum_sick_pay_days: DEFAULT_MAXIMUM_SICK_PAY_DAYS,
            days_before_end_of_sick_pay_notification:
                DEFAULT_DAYS_BEFORE_END_OF_SICK_PAY_NOTIFICATION,
        }
    }
}

/// System-wide configuration maintained by the office.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub working_time_settings: WorkingTimeSettings,
    pub sick_note_settings: SickNoteSettings,
}

impl Settings {
    pub fn validate(&self) -> AppResult<()> {
        let working_days = &self.working_time_settings.working_days;
        for day in working_days {
            weekday_from_iso(*day)?;
        }

        let sick_notes = &self.sick_note_settings;
        if sick_notes.maximum_sick_pay_days < 0 {
            return Err(AppError::invalid_argument(
                "maximumSickPayDays must not be negative",
            ));
        }

        if sick_notes.days_before_end_of_sick_pay_notification < 0 {
            return Err(AppError::invalid_argument(
                "daysBeforeEndOfSickPayNotification must not be negative",
            ));
        }

        if sick_notes.days_before_end_of_sick_pay_notification > sick_notes.maximum_sick_pay_days {
            return Err(AppError::invalid_argument(
                "daysBeforeEndOfSickPayNotification must not exceed maximumSickPayDays",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingsRow {
    pub federal_state: FederalState,
    pub working_days: Vec<i16>,
    pub maximum_sick_pay_days: i32,
    pub days_before_end_of_sick_pay_notification: i32,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            working_time_settings: WorkingTimeSettings {
                federal_state: row.federal_state,
                working_days: row
                    .working_days
                    .into_iter()
                    .filter_map(|day| u8::try_from(day).ok())
                    .collect(),
            },
            sick_note_settings: SickNoteSettings {
                maximum_sick_pay_days: row.maximum_sick_pay_days,
                days_before_end_of_sick_pay_notification: row
                    .days_before_end_of_sick_pay_notification,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let settings = Settings::default();

        assert_eq!(settings.sick_note_settings.maximum_sick_pay_days, 42);
        assert_eq!(settings.sick_note_settings.notification_threshold(), 35);
        assert_eq!(settings.working_time_settings.working_days, vec![1, 2, 3, 4, 5]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_notification_window_larger_than_maximum() {
        let mut settings = Settings::default();
        settings.sick_note_settings.days_before_end_of_sick_pay_notification = 50;

        assert!(matches!(settings.validate(), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_unknown_working_day() {
        let mut settings = Settings::default();
        settings.working_time_settings.working_days = vec![1, 9];

        assert!(settings.validate().is_err());
    }
}
