use std::hash::{Hash, Hasher};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::period::{DayLength, Period};
use super::person::PersonId;
use crate::error::{AppError, AppResult};

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum SickNoteStatus {
        Active => "active",
        ConvertedToVacation => "converted_to_vacation",
        Cancelled => "cancelled",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum SickNoteCategory {
        SickNote => "sick_note",
        SickNoteChild => "sick_note_child",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SickNoteType {
    pub id: i64,
    pub category: SickNoteCategory,
    pub message_key: String,
}

/// A sick note of one person.
///
/// Two notes are equal when person, applier, type, start, end and day length
/// match; storage ids and bookkeeping dates are ignored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SickNote {
    id: Option<i64>,
    person_id: PersonId,
    applier_id: PersonId,
    sick_note_type: SickNoteType,
    period: Period,
    aub: Option<(NaiveDate, NaiveDate)>,
    last_edited: Option<NaiveDate>,
    end_of_sick_pay_notification_send: Option<NaiveDate>,
    status: SickNoteStatus,
}

impl SickNote {
    pub fn builder() -> SickNoteBuilder {
        SickNoteBuilder::default()
    }

    /// Builder pre-filled with every field of this note.
    pub fn to_builder(&self) -> SickNoteBuilder {
        SickNoteBuilder {
            id: self.id,
            person_id: Some(self.person_id),
            applier_id: Some(self.applier_id),
            sick_note_type: Some(self.sick_note_type.clone()),
            start_date: Some(self.period.start_date()),
            end_date: Some(self.period.end_date()),
            day_length: Some(self.period.day_length()),
            aub_start_date: self.aub.map(|(start, _)| start),
            aub_end_date: self.aub.map(|(_, end)| end),
            last_edited: self.last_edited,
            end_of_sick_pay_notification_send: self.end_of_sick_pay_notification_send,
            status: Some(self.status),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn applier_id(&self) -> PersonId {
        self.applier_id
    }

    pub fn sick_note_type(&self) -> &SickNoteType {
        &self.sick_note_type
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn start_date(&self) -> NaiveDate {
        self.period.start_date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.period.end_date()
    }

    pub fn day_length(&self) -> DayLength {
        self.period.day_length()
    }

    pub fn aub_start_date(&self) -> Option<NaiveDate> {
        self.aub.map(|(start, _)| start)
    }

    pub fn aub_end_date(&self) -> Option<NaiveDate> {
        self.aub.map(|(_, end)| end)
    }

    pub fn is_aub_present(&self) -> bool {
        self.aub.is_some()
    }

    pub fn last_edited(&self) -> Option<NaiveDate> {
        self.last_edited
    }

    pub fn end_of_sick_pay_notification_send(&self) -> Option<NaiveDate> {
        self.end_of_sick_pay_notification_send
    }

    pub fn status(&self) -> SickNoteStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SickNoteStatus::Active
    }

    /// Weighted sick days from the first day up to `min(end, today)`.
    pub fn sick_days_until(&self, today: NaiveDate) -> BigDecimal {
        self.period.days_in(self.period.start_date(), today)
    }

    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl PartialEq for SickNote {
    fn eq(&self, other: &Self) -> bool {
        self.person_id == other.person_id
            && self.applier_id == other.applier_id
            && self.sick_note_type == other.sick_note_type
            && self.period == other.period
    }
}

impl Eq for SickNote {}

impl Hash for SickNote {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.person_id.hash(state);
        self.applier_id.hash(state);
        self.sick_note_type.hash(state);
        self.period.hash(state);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SickNoteBuilder {
    id: Option<i64>,
    person_id: Option<PersonId>,
    applier_id: Option<PersonId>,
    sick_note_type: Option<SickNoteType>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    day_length: Option<DayLength>,
    aub_start_date: Option<NaiveDate>,
    aub_end_date: Option<NaiveDate>,
    last_edited: Option<NaiveDate>,
    end_of_sick_pay_notification_send: Option<NaiveDate>,
    status: Option<SickNoteStatus>,
}

impl SickNoteBuilder {
    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn person_id(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }

    pub fn applier_id(mut self, applier_id: PersonId) -> Self {
        self.applier_id = Some(applier_id);
        self
    }

    pub fn sick_note_type(mut self, sick_note_type: SickNoteType) -> Self {
        self.sick_note_type = Some(sick_note_type);
        self
    }

    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn day_length(mut self, day_length: DayLength) -> Self {
        self.day_length = Some(day_length);
        self
    }

    pub fn aub_start_date(mut self, aub_start_date: Option<NaiveDate>) -> Self {
        self.aub_start_date = aub_start_date;
        self
    }

    pub fn aub_end_date(mut self, aub_end_date: Option<NaiveDate>) -> Self {
        self.aub_end_date = aub_end_date;
        self
    }

    pub fn last_edited(mut self, last_edited: Option<NaiveDate>) -> Self {
        self.last_edited = last_edited;
        self
    }

    pub fn end_of_sick_pay_notification_send(mut self, date: Option<NaiveDate>) -> Self {
        self.end_of_sick_pay_notification_send = date;
        self
    }

    pub fn status(mut self, status: SickNoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Validates the collected fields. The applier defaults to the person and
    /// the status to ACTIVE.
    pub fn build(self) -> AppResult<SickNote> {
        let person_id = self
            .person_id
            .ok_or_else(|| AppError::invalid_argument("Sick note requires a person"))?;
        let sick_note_type = self
            .sick_note_type
            .ok_or_else(|| AppError::invalid_argument("Sick note requires a type"))?;
        let start_date = self
            .start_date
            .ok_or_else(|| AppError::invalid_argument("Sick note requires a start date"))?;
        let end_date = self
            .end_date
            .ok_or_else(|| AppError::invalid_argument("Sick note requires an end date"))?;
        let day_length = self
            .day_length
            .ok_or_else(|| AppError::invalid_argument("Sick note requires a day length"))?;

        let period = Period::new(start_date, end_date, day_length)?;

        let aub = match (self.aub_start_date, self.aub_end_date) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            (Some(start), Some(end)) => {
                return Err(AppError::invalid_argument(format!(
                    "Certificate start {} must not be after certificate end {}",
                    start, end
                )));
            }
            (None, None) => None,
            _ => {
                return Err(AppError::invalid_argument(
                    "Certificate start and end date must both be set or both be empty",
                ));
            }
        };

        Ok(SickNote {
            id: self.id,
            person_id,
            applier_id: self.applier_id.unwrap_or(person_id),
            sick_note_type,
            period,
            aub,
            last_edited: self.last_edited,
            end_of_sick_pay_notification_send: self.end_of_sick_pay_notification_send,
            status: self.status.unwrap_or(SickNoteStatus::Active),
        })
    }
}

// Joined row of sick_notes and sick_note_types.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SickNoteRow {
    pub id: i64,
    pub person_id: i64,
    pub applier_id: i64,
    pub sick_note_type_id: i64,
    pub sick_note_type_category: SickNoteCategory,
    pub sick_note_type_message_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_length: DayLength,
    pub aub_start_date: Option<NaiveDate>,
    pub aub_end_date: Option<NaiveDate>,
    pub last_edited: Option<NaiveDate>,
    pub end_of_sick_pay_notification_send: Option<NaiveDate>,
    pub status: SickNoteStatus,
}

impl TryFrom<SickNoteRow> for SickNote {
    type Error = AppError;

    fn try_from(row: SickNoteRow) -> AppResult<Self> {
        SickNote::builder()
            .id(row.id)
            .person_id(row.person_id)
            .applier_id(row.applier_id)
            .sick_note_type(SickNoteType {
                id: row.sick_note_type_id,
                category: row.sick_note_type_category,
                message_key: row.sick_note_type_message_key,
            })
            .start_date(row.start_date)
            .end_date(row.end_date)
            .day_length(row.day_length)
            .aub_start_date(row.aub_start_date)
            .aub_end_date(row.aub_end_date)
            .last_edited(row.last_edited)
            .end_of_sick_pay_notification_send(row.end_of_sick_pay_notification_send)
            .status(row.status)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sick() -> SickNoteType {
        SickNoteType {
            id: 1,
            category: SickNoteCategory::SickNote,
            message_key: "application.data.sicknotetype.sicknote".to_string(),
        }
    }

    fn base() -> SickNoteBuilder {
        SickNote::builder()
            .person_id(1)
            .sick_note_type(sick())
            .start_date(date(2022, 1, 1))
            .end_date(date(2022, 1, 5))
            .day_length(DayLength::Full)
    }

    #[test]
    fn equality_ignores_id_and_bookkeeping_fields() {
        let stored = base()
            .id(10)
            .end_of_sick_pay_notification_send(Some(date(2022, 2, 1)))
            .build()
            .unwrap();
        let fresh = base().build().unwrap();

        assert_eq!(stored, fresh);

        let set: HashSet<SickNote> = [stored, fresh].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn notes_with_different_applier_differ() {
        let own = base().build().unwrap();
        let by_office = base().applier_id(99).build().unwrap();

        assert_ne!(own, by_office);
    }

    #[test]
    fn defaults_applier_and_status() {
        let note = base().build().unwrap();

        assert_eq!(note.applier_id(), 1);
        assert!(note.is_active());
    }

    #[test]
    fn missing_person_is_invalid() {
        let result = SickNote::builder()
            .sick_note_type(sick())
            .start_date(date(2022, 1, 1))
            .end_date(date(2022, 1, 1))
            .day_length(DayLength::Full)
            .build();

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn half_set_certificate_is_invalid() {
        let result = base().aub_start_date(Some(date(2022, 1, 1))).build();

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn certificate_dates_are_exposed_when_both_set() {
        let note = base()
            .aub_start_date(Some(date(2022, 1, 2)))
            .aub_end_date(Some(date(2022, 1, 3)))
            .build()
            .unwrap();

        assert!(note.is_aub_present());
        assert_eq!(note.aub_start_date(), Some(date(2022, 1, 2)));
        assert_eq!(note.aub_end_date(), Some(date(2022, 1, 3)));
    }

    #[test]
    fn sick_days_until_stops_at_today() {
        let note = base().build().unwrap();

        assert_eq!(note.sick_days_until(date(2022, 1, 3)), BigDecimal::from(3));
        assert_eq!(note.sick_days_until(date(2022, 3, 1)), BigDecimal::from(5));
        assert_eq!(note.sick_days_until(date(2021, 12, 1)), BigDecimal::from(0));
    }
}
