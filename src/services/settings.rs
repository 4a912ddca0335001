use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::database::models::Settings;
use crate::database::repositories::SettingsRepository;
use crate::error::AppResult;

/// Access to the system settings snapshot, cached between saves.
#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
    cache: Cache<(), Settings>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepository>, ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();

        Self { repository, cache }
    }

    /// Current settings. Defaults are stored on first access.
    pub async fn get_settings(&self) -> AppResult<Settings> {
        if let Some(settings) = self.cache.get(&()).await {
            return Ok(settings);
        }

        let settings = match self.repository.load().await? {
            Some(settings) => settings,
            None => {
                log::info!("No settings stored yet, saving defaults");
                self.repository.save(&Settings::default()).await?
            }
        };

        self.cache.insert((), settings.clone()).await;
        Ok(settings)
    }

    pub async fn save(&self, settings: Settings) -> AppResult<Settings> {
        settings.validate()?;

        let saved = self.repository.save(&settings).await?;
        self.cache.invalidate(&()).await;

        log::info!(
            "Updated settings: federal state {}, working days {:?}, maximum sick pay days {}, notification {} days before",
            saved.working_time_settings.federal_state,
            saved.working_time_settings.working_days,
            saved.sick_note_settings.maximum_sick_pay_days,
            saved.sick_note_settings.days_before_end_of_sick_pay_notification
        );

        Ok(saved)
    }
}
