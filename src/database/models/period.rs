use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::error::{AppError, AppResult};

/// Pattern used for every date shown to a user or written to an export.
/// It does not change with the message locale.
pub const DATE_FORMAT: &str = "%d.%m.%Y";
/// Compact variant used inside export file names.
pub const DATE_FORMAT_COMPACT: &str = "%d%m%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

string_enum! {
    /// Portion of a day an absence or a working day covers.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum DayLength {
        Zero => "zero",
        Morning => "morning",
        Noon => "noon",
        Full => "full",
    }
}

impl DayLength {
    /// Fraction of a day this length stands for.
    pub fn multiplier(&self) -> BigDecimal {
        match self {
            DayLength::Zero => BigDecimal::zero(),
            DayLength::Morning | DayLength::Noon => BigDecimal::new(5.into(), 1),
            DayLength::Full => BigDecimal::from(1),
        }
    }

    pub fn is_half_day(&self) -> bool {
        matches!(self, DayLength::Morning | DayLength::Noon)
    }

    /// Key under which the localized label of this length is found.
    pub fn message_key(&self) -> &'static str {
        match self {
            DayLength::Zero => "ZERO",
            DayLength::Morning => "MORNING",
            DayLength::Noon => "NOON",
            DayLength::Full => "FULL",
        }
    }
}

/// A contiguous absence between two dates (both inclusive) at a fixed granularity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    start_date: NaiveDate,
    end_date: NaiveDate,
    day_length: DayLength,
}

impl Period {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, day_length: DayLength) -> AppResult<Self> {
        if start_date > end_date {
            return Err(AppError::invalid_argument(format!(
                "Start date {} must not be after end date {}",
                start_date, end_date
            )));
        }

        if day_length == DayLength::Zero {
            return Err(AppError::invalid_argument("Day length of a period may not be zero"));
        }

        if day_length.is_half_day() && start_date != end_date {
            return Err(AppError::invalid_argument(format!(
                "A {} period must start and end on the same day",
                day_length
            )));
        }

        Ok(Self {
            start_date,
            end_date,
            day_length,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn day_length(&self) -> DayLength {
        self.day_length
    }

    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date <= to && self.end_date >= from
    }

    /// Weighted number of days of this period falling inside `[from, to]`.
    pub fn days_in(&self, from: NaiveDate, to: NaiveDate) -> BigDecimal {
        let first = self.start_date.max(from);
        let last = self.end_date.min(to);

        if first > last {
            return BigDecimal::zero();
        }

        let calendar_days = (last - first).num_days() + 1;
        BigDecimal::from(calendar_days) * self.day_length.multiplier()
    }

    /// Weighted number of days of the whole period.
    pub fn length(&self) -> BigDecimal {
        self.days_in(self.start_date, self.end_date)
    }
}

/// Query window used by statistics and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl FilterPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<Self> {
        if start_date > end_date {
            return Err(AppError::invalid_argument(format!(
                "Filter start {} must not be after filter end {}",
                format_date(start_date),
                format_date(end_date)
            )));
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The whole calendar year `today` falls in.
    pub fn year_of(today: NaiveDate) -> Self {
        let year = today.year();
        Self {
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today),
            end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_date_formatted(&self) -> String {
        format_date(self.start_date)
    }

    pub fn end_date_formatted(&self) -> String {
        format_date(self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_length_multipliers() {
        assert_eq!(DayLength::Zero.multiplier(), BigDecimal::from(0));
        assert_eq!(DayLength::Morning.multiplier(), BigDecimal::new(5.into(), 1));
        assert_eq!(DayLength::Noon.multiplier(), BigDecimal::new(5.into(), 1));
        assert_eq!(DayLength::Full.multiplier(), BigDecimal::from(1));
    }

    #[test]
    fn day_length_round_trips_through_its_string_form() {
        assert_eq!("MORNING".parse::<DayLength>(), Ok(DayLength::Morning));
        assert_eq!(DayLength::Noon.to_string(), "noon");
        assert!("half".parse::<DayLength>().is_err());
    }

    #[test]
    fn rejects_start_after_end() {
        let result = Period::new(date(2022, 1, 2), date(2022, 1, 1), DayLength::Full);
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_zero_day_length() {
        let result = Period::new(date(2022, 1, 1), date(2022, 1, 1), DayLength::Zero);
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_multi_day_half_day_period() {
        let result = Period::new(date(2022, 1, 1), date(2022, 1, 3), DayLength::Morning);
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn length_is_weighted_by_day_length() {
        let full = Period::new(date(2022, 1, 1), date(2022, 1, 10), DayLength::Full).unwrap();
        let noon = Period::new(date(2022, 1, 1), date(2022, 1, 1), DayLength::Noon).unwrap();

        assert_eq!(full.length(), BigDecimal::from(10));
        assert_eq!(noon.length(), BigDecimal::new(5.into(), 1));
    }

    #[test]
    fn days_in_clips_to_the_window() {
        let period = Period::new(date(2021, 12, 30), date(2022, 1, 3), DayLength::Full).unwrap();

        assert_eq!(period.days_in(date(2022, 1, 1), date(2022, 12, 31)), BigDecimal::from(3));
        assert_eq!(period.days_in(date(2023, 1, 1), date(2023, 12, 31)), BigDecimal::from(0));
        assert!(period.overlaps(date(2022, 1, 3), date(2022, 1, 3)));
        assert!(!period.overlaps(date(2022, 1, 4), date(2022, 2, 1)));
    }

    #[test]
    fn filter_period_defaults_to_calendar_year() {
        let period = FilterPeriod::year_of(date(2022, 6, 15));

        assert_eq!(period.start_date_formatted(), "01.01.2022");
        assert_eq!(period.end_date_formatted(), "31.12.2022");
    }

    #[test]
    fn filter_period_rejects_inverted_window() {
        assert!(FilterPeriod::new(date(2022, 2, 1), date(2022, 1, 1)).is_err());
    }
}
