use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::{
    models::{PersonId, SickNote, SickNoteRow, SickNoteStatus},
    utils::sql,
};

#[async_trait]
pub trait SickNoteRepository: Send + Sync {
    /// Inserts notes without id and updates the others; returns the stored note.
    async fn save(&self, sick_note: &SickNote) -> Result<SickNote>;

    async fn find_by_id(&self, id: i64) -> Result<Option<SickNote>>;

    /// Notes of the person overlapping `[from, to]`.
    async fn find_by_person_and_period(
        &self,
        person_id: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SickNote>>;

    async fn find_by_period(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SickNote>>;

    /// Active notes that have not been stamped with an end-of-sick-pay notification.
    async fn find_active_without_end_of_sick_pay_notification(&self) -> Result<Vec<SickNote>>;

    /// Active notes overlapping the calendar year.
    async fn find_all_active_by_year(&self, year: i32) -> Result<Vec<SickNote>>;

    async fn count_persons_with_active_sick_note(&self, year: i32) -> Result<i64>;

    async fn find_by_status_in_and_end_date_since(
        &self,
        statuses: &[SickNoteStatus],
        since: NaiveDate,
    ) -> Result<Vec<SickNote>>;

    async fn find_by_status_in_and_person_in_and_period(
        &self,
        statuses: &[SickNoteStatus],
        person_ids: &[PersonId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SickNote>>;
}

const SICK_NOTE_SELECT: &str = r#"
    SELECT
        sn.id,
        sn.person_id,
        sn.applier_id,
        snt.id AS sick_note_type_id,
        snt.category AS sick_note_type_category,
        snt.message_key AS sick_note_type_message_key,
        sn.start_date,
        sn.end_date,
        sn.day_length,
        sn.aub_start_date,
        sn.aub_end_date,
        sn.last_edited,
        sn.end_of_sick_pay_notification_send,
        sn.status
    FROM
        sick_notes sn
        INNER JOIN sick_note_types snt ON sn.sick_note_type_id = snt.id
"#;

fn to_sick_notes(rows: Vec<SickNoteRow>) -> Result<Vec<SickNote>> {
    rows.into_iter()
        .map(|row| SickNote::try_from(row).map_err(anyhow::Error::from))
        .collect()
}

fn status_names(statuses: &[SickNoteStatus]) -> Vec<String> {
    statuses.iter().map(|status| status.to_string()).collect()
}

#[derive(Clone)]
pub struct PgSickNoteRepository {
    pool: PgPool,
}

impl PgSickNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SickNoteRepository for PgSickNoteRepository {
    async fn save(&self, sick_note: &SickNote) -> Result<SickNote> {
        let id = match sick_note.id() {
            Some(id) => {
                sqlx::query(&sql(r#"
                    UPDATE
                        sick_notes
                    SET
                        person_id = ?,
                        applier_id = ?,
                        sick_note_type_id = ?,
                        start_date = ?,
                        end_date = ?,
                        day_length = ?,
                        aub_start_date = ?,
                        aub_end_date = ?,
                        last_edited = ?,
                        end_of_sick_pay_notification_send = ?,
                        status = ?
                    WHERE
                        id = ?
                "#))
                .bind(sick_note.person_id())
                .bind(sick_note.applier_id())
                .bind(sick_note.sick_note_type().id)
                .bind(sick_note.start_date())
                .bind(sick_note.end_date())
                .bind(sick_note.day_length())
                .bind(sick_note.aub_start_date())
                .bind(sick_note.aub_end_date())
                .bind(sick_note.last_edited())
                .bind(sick_note.end_of_sick_pay_notification_send())
                .bind(sick_note.status())
                .bind(id)
                .execute(&self.pool)
                .await?;

                id
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(&sql(r#"
                    INSERT INTO
                        sick_notes (
                            person_id,
                            applier_id,
                            sick_note_type_id,
                            start_date,
                            end_date,
                            day_length,
                            aub_start_date,
                            aub_end_date,
                            last_edited,
                            end_of_sick_pay_notification_send,
                            status
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    RETURNING
                        id
                "#))
                .bind(sick_note.person_id())
                .bind(sick_note.applier_id())
                .bind(sick_note.sick_note_type().id)
                .bind(sick_note.start_date())
                .bind(sick_note.end_date())
                .bind(sick_note.day_length())
                .bind(sick_note.aub_start_date())
                .bind(sick_note.aub_end_date())
                .bind(sick_note.last_edited())
                .bind(sick_note.end_of_sick_pay_notification_send())
                .bind(sick_note.status())
                .fetch_one(&self.pool)
                .await?;

                id
            }
        };

        Ok(sick_note.clone().with_id(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SickNote>> {
        let row = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            "{} WHERE sn.id = ?",
            SICK_NOTE_SELECT
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(SickNote::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_person_and_period(
        &self,
        person_id: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SickNote>> {
        let rows = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            r#"
            {}
            WHERE
                sn.person_id = ?
                AND sn.start_date <= ?
                AND sn.end_date >= ?
            ORDER BY
                sn.start_date
            "#,
            SICK_NOTE_SELECT
        )))
        .bind(person_id)
        .bind(to)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        to_sick_notes(rows)
    }

    async fn find_by_period(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SickNote>> {
        let rows = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            r#"
            {}
            WHERE
                sn.start_date <= ?
                AND sn.end_date >= ?
            ORDER BY
                sn.start_date
            "#,
            SICK_NOTE_SELECT
        )))
        .bind(to)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        to_sick_notes(rows)
    }

    async fn find_active_without_end_of_sick_pay_notification(&self) -> Result<Vec<SickNote>> {
        let rows = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            r#"
            {}
            WHERE
                sn.status = ?
                AND sn.end_of_sick_pay_notification_send IS NULL
            ORDER BY
                sn.start_date
            "#,
            SICK_NOTE_SELECT
        )))
        .bind(SickNoteStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        to_sick_notes(rows)
    }

    async fn find_all_active_by_year(&self, year: i32) -> Result<Vec<SickNote>> {
        let rows = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            r#"
            {}
            WHERE
                sn.status = ?
                AND sn.start_date <= make_date(?, 12, 31)
                AND sn.end_date >= make_date(?, 1, 1)
            ORDER BY
                sn.start_date
            "#,
            SICK_NOTE_SELECT
        )))
        .bind(SickNoteStatus::Active)
        .bind(year)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        to_sick_notes(rows)
    }

    async fn count_persons_with_active_sick_note(&self, year: i32) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&sql(r#"
            SELECT
                COUNT(DISTINCT person_id)
            FROM
                sick_notes
            WHERE
                status = ?
                AND start_date <= make_date(?, 12, 31)
                AND end_date >= make_date(?, 1, 1)
        "#))
        .bind(SickNoteStatus::Active)
        .bind(year)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_by_status_in_and_end_date_since(
        &self,
        statuses: &[SickNoteStatus],
        since: NaiveDate,
    ) -> Result<Vec<SickNote>> {
        let rows = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            r#"
            {}
            WHERE
                sn.status = ANY(?)
                AND sn.end_date >= ?
            ORDER BY
                sn.start_date
            "#,
            SICK_NOTE_SELECT
        )))
        .bind(status_names(statuses))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        to_sick_notes(rows)
    }

    async fn find_by_status_in_and_person_in_and_period(
        &self,
        statuses: &[SickNoteStatus],
        person_ids: &[PersonId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SickNote>> {
        let rows = sqlx::query_as::<_, SickNoteRow>(&sql(&format!(
            r#"
            {}
            WHERE
                sn.status = ANY(?)
                AND sn.person_id = ANY(?)
                AND sn.end_date >= ?
                AND sn.start_date <= ?
            ORDER BY
                sn.person_id,
                sn.start_date
            "#,
            SICK_NOTE_SELECT
        )))
        .bind(status_names(statuses))
        .bind(person_ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        to_sick_notes(rows)
    }
}
