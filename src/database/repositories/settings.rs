use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{
    models::{Settings, SettingsRow},
    utils::sql,
};

/// Single-row store of the system settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load(&self) -> Result<Option<Settings>>;

    async fn save(&self, settings: &Settings) -> Result<Settings>;
}

#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn load(&self) -> Result<Option<Settings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT
                federal_state,
                working_days,
                maximum_sick_pay_days,
                days_before_end_of_sick_pay_notification
            FROM
                settings
            WHERE
                id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Settings::from))
    }

    async fn save(&self, settings: &Settings) -> Result<Settings> {
        let working_days: Vec<i16> = settings
            .working_time_settings
            .working_days
            .iter()
            .map(|day| i16::from(*day))
            .collect();

        let row = sqlx::query_as::<_, SettingsRow>(&sql(r#"
            INSERT INTO
                settings (
                    id,
                    federal_state,
                    working_days,
                    maximum_sick_pay_days,
                    days_before_end_of_sick_pay_notification
                )
            VALUES
                (1, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                federal_state = EXCLUDED.federal_state,
                working_days = EXCLUDED.working_days,
                maximum_sick_pay_days = EXCLUDED.maximum_sick_pay_days,
                days_before_end_of_sick_pay_notification = EXCLUDED.days_before_end_of_sick_pay_notification
            RETURNING
                federal_state,
                working_days,
                maximum_sick_pay_days,
                days_before_end_of_sick_pay_notification
        "#))
        .bind(settings.working_time_settings.federal_state)
        .bind(working_days)
        .bind(settings.sick_note_settings.maximum_sick_pay_days)
        .bind(settings.sick_note_settings.days_before_end_of_sick_pay_notification)
        .fetch_one(&self.pool)
        .await?;

        Ok(Settings::from(row))
    }
}
