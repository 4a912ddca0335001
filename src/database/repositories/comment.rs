use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{
    models::{ApplicationComment, CommentRow, OvertimeComment},
    utils::sql,
};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn save_application_comment(&self, comment: &ApplicationComment) -> Result<ApplicationComment>;

    /// Comments of the application, oldest first.
    async fn find_by_application(&self, application_id: i64) -> Result<Vec<ApplicationComment>>;

    async fn save_overtime_comment(&self, comment: &OvertimeComment) -> Result<OvertimeComment>;

    /// Comments of the overtime record, oldest first.
    async fn find_by_overtime(&self, overtime_id: i64) -> Result<Vec<OvertimeComment>>;
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        table: &str,
        subject_id: i64,
        author_id: i64,
        action: &str,
        text: Option<&str>,
        date: chrono::NaiveDate,
    ) -> Result<CommentRow> {
        let row = sqlx::query_as::<_, CommentRow>(&sql(&format!(
            r#"
            INSERT INTO
                {} (subject_id, author_id, action, text, date)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id, subject_id, author_id, action, text, date
            "#,
            table
        )))
        .bind(subject_id)
        .bind(author_id)
        .bind(action)
        .bind(text)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_subject(&self, table: &str, subject_id: i64) -> Result<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT id, subject_id, author_id, action, text, date FROM {} WHERE subject_id = $1 ORDER BY date, id",
            table
        ))
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn save_application_comment(&self, comment: &ApplicationComment) -> Result<ApplicationComment> {
        let row = self
            .insert(
                "application_comments",
                comment.subject_id,
                comment.author_id,
                comment.action.as_str(),
                comment.text.as_deref(),
                comment.date,
            )
            .await?;

        Ok(ApplicationComment::try_from(row)?)
    }

    async fn find_by_application(&self, application_id: i64) -> Result<Vec<ApplicationComment>> {
        self.find_by_subject("application_comments", application_id)
            .await?
            .into_iter()
            .map(|row| ApplicationComment::try_from(row).map_err(anyhow::Error::from))
            .collect()
    }

    async fn save_overtime_comment(&self, comment: &OvertimeComment) -> Result<OvertimeComment> {
        let row = self
            .insert(
                "overtime_comments",
                comment.subject_id,
                comment.author_id,
                comment.action.as_str(),
                comment.text.as_deref(),
                comment.date,
            )
            .await?;

        Ok(OvertimeComment::try_from(row)?)
    }

    async fn find_by_overtime(&self, overtime_id: i64) -> Result<Vec<OvertimeComment>> {
        self.find_by_subject("overtime_comments", overtime_id)
            .await?
            .into_iter()
            .map(|row| OvertimeComment::try_from(row).map_err(anyhow::Error::from))
            .collect()
    }
}
