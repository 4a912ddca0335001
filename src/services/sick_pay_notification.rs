use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::database::models::{format_date, Person, SickNote, SickNoteSettings};
use crate::error::AppResult;
use crate::services::person::PersonService;
use crate::services::settings::SettingsService;
use crate::services::sick_note::SickNoteService;

/// Delivers the end-of-sick-pay notice to the sick person and the office.
#[async_trait]
pub trait SickPayNotifier: Send + Sync {
    async fn notify_end_of_sick_pay(
        &self,
        person: &Person,
        sick_note: &SickNote,
        settings: &SickNoteSettings,
    ) -> Result<()>;
}

/// Writes the notice to the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl SickPayNotifier for LoggingNotifier {
    async fn notify_end_of_sick_pay(
        &self,
        person: &Person,
        sick_note: &SickNote,
        settings: &SickNoteSettings,
    ) -> Result<()> {
        log::info!(
            "Sick pay of {} <{}> for sick note {:?} ({} - {}) ends after {} days",
            person.nice_name(),
            person.email,
            sick_note.id(),
            format_date(sick_note.start_date()),
            format_date(sick_note.end_date()),
            settings.maximum_sick_pay_days
        );
        Ok(())
    }
}

/// Notifies about every sick note reaching the end of sick pay and stamps it
/// afterwards, so each note is announced at most once.
#[derive(Clone)]
pub struct EndOfSickPayNotificationService {
    sick_note_service: SickNoteService,
    person_service: PersonService,
    settings_service: SettingsService,
    notifier: Arc<dyn SickPayNotifier>,
}

impl EndOfSickPayNotificationService {
    pub fn new(
        sick_note_service: SickNoteService,
        person_service: PersonService,
        settings_service: SettingsService,
        notifier: Arc<dyn SickPayNotifier>,
    ) -> Self {
        Self {
            sick_note_service,
            person_service,
            settings_service,
            notifier,
        }
    }

    /// Returns the notes that were notified and stamped. A note whose
    /// notification fails stays unstamped and is picked up by the next run.
    pub async fn send_notifications(&self) -> AppResult<Vec<SickNote>> {
        let settings = self.settings_service.get_settings().await?.sick_note_settings;
        let sick_notes = self
            .sick_note_service
            .get_sick_notes_reaching_end_of_sick_pay()
            .await?;

        log::info!(
            "Found {} sick notes reaching end of sick pay",
            sick_notes.len()
        );

        let mut notified = Vec::with_capacity(sick_notes.len());
        for sick_note in sick_notes {
            let Some(person) = self.person_service.get_by_id(sick_note.person_id()).await? else {
                log::warn!(
                    "Skipping sick note {:?}: person {} does not exist",
                    sick_note.id(),
                    sick_note.person_id()
                );
                continue;
            };

            if let Err(err) = self
                .notifier
                .notify_end_of_sick_pay(&person, &sick_note, &settings)
                .await
            {
                log::error!(
                    "Could not send end of sick pay notification for sick note {:?}: {}",
                    sick_note.id(),
                    err
                );
                continue;
            }

            notified.push(
                self.sick_note_service
                    .set_end_of_sick_pay_notification_send(&sick_note)
                    .await?,
            );
        }

        Ok(notified)
    }
}
