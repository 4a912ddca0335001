use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::period::DayLength;
use super::person::PersonId;
use crate::error::{AppError, AppResult};

string_enum! {
    /// Regional jurisdiction that decides which public holidays apply.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum FederalState {
        BadenWuerttemberg => "germany_baden_wuerttemberg",
        Bayern => "germany_bayern",
        BayernMuenchen => "germany_bayern_muenchen",
        BayernAugsburg => "germany_bayern_augsburg",
        Berlin => "germany_berlin",
        Brandenburg => "germany_brandenburg",
        Bremen => "germany_bremen",
        Hamburg => "germany_hamburg",
        Hessen => "germany_hessen",
        MecklenburgVorpommern => "germany_mecklenburg_vorpommern",
        Niedersachsen => "germany_niedersachsen",
        NordrheinWestfalen => "germany_nordrhein_westfalen",
        RheinlandPfalz => "germany_rheinland_pfalz",
        Saarland => "germany_saarland",
        Sachsen => "germany_sachsen",
        SachsenAnhalt => "germany_sachsen_anhalt",
        SchleswigHolstein => "germany_schleswig_holstein",
        Thueringen => "germany_thueringen",
    }
}

/// Converts an ISO day number (1 = Monday .. 7 = Sunday) into a weekday.
pub fn weekday_from_iso(day: u8) -> AppResult<Weekday> {
    match day {
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        7 => Ok(Weekday::Sun),
        other => Err(AppError::invalid_argument(format!(
            "Working day must be between 1 (Monday) and 7 (Sunday), got {}",
            other
        ))),
    }
}

/// Weekly working pattern of a person, effective from `valid_from` until the
/// next entry of the same person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTime {
    pub person_id: PersonId,
    pub valid_from: NaiveDate,
    /// Indexed Monday (0) .. Sunday (6).
    pub days: [DayLength; 7],
    pub federal_state_override: Option<FederalState>,
}

impl WorkingTime {
    pub fn new(person_id: PersonId, valid_from: NaiveDate) -> Self {
        Self {
            person_id,
            valid_from,
            days: [DayLength::Zero; 7],
            federal_state_override: None,
        }
    }

    pub fn day_length_for(&self, weekday: Weekday) -> DayLength {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn set_day_length_for(&mut self, weekday: Weekday, day_length: DayLength) {
        self.days[weekday.num_days_from_monday() as usize] = day_length;
    }

    pub fn reset_work_days(&mut self) {
        self.days = [DayLength::Zero; 7];
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.day_length_for(date.weekday()) != DayLength::Zero
    }

    /// ISO numbers of all days that are not ZERO.
    pub fn working_days(&self) -> Vec<u8> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, day_length)| **day_length != DayLength::Zero)
            .map(|(index, _)| index as u8 + 1)
            .collect()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkingTimeRow {
    pub person_id: i64,
    pub valid_from: NaiveDate,
    pub monday: DayLength,
    pub tuesday: DayLength,
    pub wednesday: DayLength,
    pub thursday: DayLength,
    pub friday: DayLength,
    pub saturday: DayLength,
    pub sunday: DayLength,
    pub federal_state_override: Option<FederalState>,
}

impl From<WorkingTimeRow> for WorkingTime {
    fn from(row: WorkingTimeRow) -> Self {
        Self {
            person_id: row.person_id,
            valid_from: row.valid_from,
            days: [
                row.monday,
                row.tuesday,
                row.wednesday,
                row.thursday,
                row.friday,
                row.saturday,
                row.sunday,
            ],
            federal_state_override: row.federal_state_override,
        }
    }
}

/// The effective-dated chain of working times of one person, sorted by
/// `valid_from` ascending with at most one entry per date.
#[derive(Debug, Clone, Default)]
pub struct WorkingTimeHistory {
    entries: Vec<WorkingTime>,
}

impl WorkingTimeHistory {
    pub fn new(mut entries: Vec<WorkingTime>) -> Self {
        entries.sort_by_key(|entry| entry.valid_from);
        entries.dedup_by_key(|entry| entry.valid_from);
        Self { entries }
    }

    pub fn entries(&self) -> &[WorkingTime] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts the entry or replaces the one with the same `valid_from`.
    pub fn upsert(&mut self, working_time: WorkingTime) {
        match self
            .entries
            .binary_search_by_key(&working_time.valid_from, |entry| entry.valid_from)
        {
            Ok(index) => self.entries[index] = working_time,
            Err(index) => self.entries.insert(index, working_time),
        }
    }

    pub fn find_exact(&self, valid_from: NaiveDate) -> Option<&WorkingTime> {
        self.entries
            .binary_search_by_key(&valid_from, |entry| entry.valid_from)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Latest entry with `valid_from <= date`.
    pub fn effective_at(&self, date: NaiveDate) -> Option<&WorkingTime> {
        let after = self.entries.partition_point(|entry| entry.valid_from <= date);
        after.checked_sub(1).map(|index| &self.entries[index])
    }

    /// Entries that are in effect on at least one day of `[start, end]`.
    pub fn in_interval(&self, start: NaiveDate, end: NaiveDate) -> Vec<&WorkingTime> {
        let first = self
            .entries
            .partition_point(|entry| entry.valid_from <= start)
            .saturating_sub(1);
        self.entries[first..]
            .iter()
            .take_while(|entry| entry.valid_from <= end)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTimeInput {
    pub valid_from: NaiveDate,
    pub working_days: Vec<u8>,
    pub federal_state: Option<FederalState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn working_time(valid_from: NaiveDate) -> WorkingTime {
        WorkingTime::new(1, valid_from)
    }

    #[test]
    fn effective_at_picks_latest_entry_not_after_date() {
        let history = WorkingTimeHistory::new(vec![
            working_time(date(2022, 6, 1)),
            working_time(date(2020, 1, 1)),
            working_time(date(2021, 3, 15)),
        ]);

        assert_eq!(history.effective_at(date(2019, 12, 31)), None);
        assert_eq!(history.effective_at(date(2020, 1, 1)).unwrap().valid_from, date(2020, 1, 1));
        assert_eq!(history.effective_at(date(2021, 3, 14)).unwrap().valid_from, date(2020, 1, 1));
        assert_eq!(history.effective_at(date(2021, 3, 15)).unwrap().valid_from, date(2021, 3, 15));
        assert_eq!(history.effective_at(date(2030, 1, 1)).unwrap().valid_from, date(2022, 6, 1));
    }

    #[test]
    fn upsert_replaces_same_valid_from() {
        let mut history = WorkingTimeHistory::default();
        history.upsert(working_time(date(2022, 1, 1)));

        let mut replacement = working_time(date(2022, 1, 1));
        replacement.set_day_length_for(Weekday::Mon, DayLength::Full);
        history.upsert(replacement.clone());

        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.find_exact(date(2022, 1, 1)), Some(&replacement));
    }

    #[test]
    fn in_interval_includes_entry_effective_at_start() {
        let history = WorkingTimeHistory::new(vec![
            working_time(date(2020, 1, 1)),
            working_time(date(2021, 1, 1)),
            working_time(date(2022, 1, 1)),
            working_time(date(2023, 1, 1)),
        ]);

        let found: Vec<NaiveDate> = history
            .in_interval(date(2021, 6, 1), date(2022, 6, 1))
            .iter()
            .map(|entry| entry.valid_from)
            .collect();

        assert_eq!(found, vec![date(2021, 1, 1), date(2022, 1, 1)]);
    }

    #[test]
    fn working_days_lists_iso_numbers() {
        let mut working_time = working_time(date(2022, 1, 1));
        working_time.set_day_length_for(Weekday::Mon, DayLength::Full);
        working_time.set_day_length_for(Weekday::Fri, DayLength::Morning);

        assert_eq!(working_time.working_days(), vec![1, 5]);
        assert!(working_time.is_working_day(date(2022, 1, 3)));
        assert!(!working_time.is_working_day(date(2022, 1, 4)));
    }

    #[test]
    fn iso_day_numbers_outside_week_are_rejected() {
        assert_eq!(weekday_from_iso(7).unwrap(), Weekday::Sun);
        assert!(weekday_from_iso(0).is_err());
        assert!(weekday_from_iso(8).is_err());
    }
}
