use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::clock::Clock;
use crate::database::models::{Person, SickNote, SickNoteSettings, SickNoteStatus};
use crate::database::repositories::SickNoteRepository;
use crate::error::{AppError, AppResult};
use crate::services::settings::SettingsService;

/// Whether the note is due for the end-of-sick-pay notification on `today`.
///
/// The note must be active and not yet stamped, and its weighted sick days
/// from the first day up to `min(end, today)` must reach
/// `maximum_sick_pay_days - days_before_end_of_sick_pay_notification`.
pub fn reaches_end_of_sick_pay(note: &SickNote, settings: &SickNoteSettings, today: NaiveDate) -> bool {
    note.is_active()
        && note.end_of_sick_pay_notification_send().is_none()
        && note.sick_days_until(today) >= BigDecimal::from(settings.notification_threshold())
}

#[derive(Clone)]
pub struct SickNoteService {
    repository: Arc<dyn SickNoteRepository>,
    settings_service: SettingsService,
    clock: Arc<dyn Clock>,
}

impl SickNoteService {
    pub fn new(
        repository: Arc<dyn SickNoteRepository>,
        settings_service: SettingsService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            settings_service,
            clock,
        }
    }

    pub async fn save(&self, sick_note: &SickNote) -> AppResult<SickNote> {
        let saved = self.repository.save(sick_note).await?;
        log::info!(
            "Saved sick note {:?} of person {}",
            saved.id(),
            saved.person_id()
        );
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<SickNote>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn get_by_person_and_period(
        &self,
        person: &Person,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<SickNote>> {
        Ok(self
            .repository
            .find_by_person_and_period(person.id, from, to)
            .await?)
    }

    pub async fn get_by_period(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<SickNote>> {
        Ok(self.repository.find_by_period(from, to).await?)
    }

    /// Notes due for the end-of-sick-pay notification today. Does not modify anything.
    pub async fn get_sick_notes_reaching_end_of_sick_pay(&self) -> AppResult<Vec<SickNote>> {
        let settings = self.settings_service.get_settings().await?;
        let today = self.clock.today();

        Ok(self
            .repository
            .find_active_without_end_of_sick_pay_notification()
            .await?
            .into_iter()
            .filter(|note| reaches_end_of_sick_pay(note, &settings.sick_note_settings, today))
            .collect())
    }

    pub async fn get_all_active_by_year(&self, year: i32) -> AppResult<Vec<SickNote>> {
        Ok(self.repository.find_all_active_by_year(year).await?)
    }

    pub async fn get_number_of_persons_with_minimum_one_sick_note(&self, year: i32) -> AppResult<i64> {
        Ok(self.repository.count_persons_with_active_sick_note(year).await?)
    }

    /// Notes in one of the states that end on or after `since`.
    pub async fn get_for_states_since(
        &self,
        statuses: &[SickNoteStatus],
        since: NaiveDate,
    ) -> AppResult<Vec<SickNote>> {
        Ok(self
            .repository
            .find_by_status_in_and_end_date_since(statuses, since)
            .await?)
    }

    /// Notes of the persons in one of the states overlapping `[start, end]`.
    pub async fn get_for_states_and_person(
        &self,
        statuses: &[SickNoteStatus],
        persons: &[Person],
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<SickNote>> {
        let person_ids: Vec<_> = persons.iter().map(|person| person.id).collect();
        Ok(self
            .repository
            .find_by_status_in_and_person_in_and_period(statuses, &person_ids, start, end)
            .await?)
    }

    /// Stamps the note with today as notification date and stores it.
    pub async fn set_end_of_sick_pay_notification_send(&self, sick_note: &SickNote) -> AppResult<SickNote> {
        if sick_note.id().is_none() {
            return Err(AppError::invalid_argument(
                "Only stored sick notes can be marked as notified",
            ));
        }

        let today = self.clock.today();
        let stamped = sick_note
            .to_builder()
            .end_of_sick_pay_notification_send(Some(today))
            .build()?;

        let saved = self.repository.save(&stamped).await?;
        log::info!(
            "Marked end of sick pay notification of sick note {:?} as sent on {}",
            saved.id(),
            today
        );

        Ok(saved)
    }
}
