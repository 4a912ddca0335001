use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::{
    models::{PersonId, WorkingTime, WorkingTimeRow},
    utils::sql,
};

#[async_trait]
pub trait WorkingTimeRepository: Send + Sync {
    async fn find_by_person_and_valid_from(
        &self,
        person_id: PersonId,
        valid_from: NaiveDate,
    ) -> Result<Option<WorkingTime>>;

    /// Latest entry of the person with `valid_from <= date`.
    async fn find_effective_at(&self, person_id: PersonId, date: NaiveDate) -> Result<Option<WorkingTime>>;

    /// All entries of the person, newest first.
    async fn find_by_person(&self, person_id: PersonId) -> Result<Vec<WorkingTime>>;

    /// Entries of the given persons in effect on at least one day of `[start, end]`.
    async fn find_by_persons_and_interval(
        &self,
        person_ids: &[PersonId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkingTime>>;

    async fn save(&self, working_time: &WorkingTime) -> Result<WorkingTime>;
}

const WORKING_TIME_COLUMNS: &str = "person_id, valid_from, monday, tuesday, wednesday, thursday, friday, saturday, sunday, federal_state_override";

#[derive(Clone)]
pub struct PgWorkingTimeRepository {
    pool: PgPool,
}

impl PgWorkingTimeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkingTimeRepository for PgWorkingTimeRepository {
    async fn find_by_person_and_valid_from(
        &self,
        person_id: PersonId,
        valid_from: NaiveDate,
    ) -> Result<Option<WorkingTime>> {
        let row = sqlx::query_as::<_, WorkingTimeRow>(&sql(&format!(
            "SELECT {} FROM working_times WHERE person_id = ? AND valid_from = ?",
            WORKING_TIME_COLUMNS
        )))
        .bind(person_id)
        .bind(valid_from)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WorkingTime::from))
    }

    async fn find_effective_at(&self, person_id: PersonId, date: NaiveDate) -> Result<Option<WorkingTime>> {
        let row = sqlx::query_as::<_, WorkingTimeRow>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                working_times
            WHERE
                person_id = ?
                AND valid_from <= ?
            ORDER BY
                valid_from DESC
            LIMIT 1
            "#,
            WORKING_TIME_COLUMNS
        )))
        .bind(person_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WorkingTime::from))
    }

    async fn find_by_person(&self, person_id: PersonId) -> Result<Vec<WorkingTime>> {
        let rows = sqlx::query_as::<_, WorkingTimeRow>(&sql(&format!(
            "SELECT {} FROM working_times WHERE person_id = ? ORDER BY valid_from DESC",
            WORKING_TIME_COLUMNS
        )))
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WorkingTime::from).collect())
    }

    async fn find_by_persons_and_interval(
        &self,
        person_ids: &[PersonId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkingTime>> {
        // The entry effective at `start` began on or before it, so the lower
        // bound is the latest valid_from per person not after `start`.
        let rows = sqlx::query_as::<_, WorkingTimeRow>(&sql(&format!(
            r#"
            SELECT
                {columns}
            FROM
                working_times wt
            WHERE
                wt.person_id = ANY(?)
                AND wt.valid_from <= ?
                AND wt.valid_from >= COALESCE(
                    (
                        SELECT MAX(earlier.valid_from)
                        FROM working_times earlier
                        WHERE earlier.person_id = wt.person_id
                            AND earlier.valid_from <= ?
                    ),
                    wt.valid_from
                )
            ORDER BY
                wt.person_id,
                wt.valid_from
            "#,
            columns = WORKING_TIME_COLUMNS
        )))
        .bind(person_ids)
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WorkingTime::from).collect())
    }

    async fn save(&self, working_time: &WorkingTime) -> Result<WorkingTime> {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = working_time.days;

        let row = sqlx::query_as::<_, WorkingTimeRow>(&sql(&format!(
            r#"
            INSERT INTO
                working_times ({columns})
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (person_id, valid_from) DO UPDATE SET
                monday = EXCLUDED.monday,
                tuesday = EXCLUDED.tuesday,
                wednesday = EXCLUDED.wednesday,
                thursday = EXCLUDED.thursday,
                friday = EXCLUDED.friday,
                saturday = EXCLUDED.saturday,
                sunday = EXCLUDED.sunday,
                federal_state_override = EXCLUDED.federal_state_override
            RETURNING
                {columns}
            "#,
            columns = WORKING_TIME_COLUMNS
        )))
        .bind(working_time.person_id)
        .bind(working_time.valid_from)
        .bind(monday)
        .bind(tuesday)
        .bind(wednesday)
        .bind(thursday)
        .bind(friday)
        .bind(saturday)
        .bind(sunday)
        .bind(working_time.federal_state_override)
        .fetch_one(&self.pool)
        .await?;

        Ok(WorkingTime::from(row))
    }
}
