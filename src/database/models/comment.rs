use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::person::PersonId;
use crate::error::{AppError, AppResult};

string_enum! {
    /// Lifecycle step of an application for leave a comment is attached to.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum ApplicationAction {
        Applied => "applied",
        TemporaryAllowed => "temporary_allowed",
        Allowed => "allowed",
        Rejected => "rejected",
        Cancelled => "cancelled",
        Revoked => "revoked",
        Edited => "edited",
        Commented => "commented",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub enum OvertimeAction {
        Created => "created",
        Edited => "edited",
        Commented => "commented",
    }
}

/// Comment written by a person on a record (application or overtime entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment<A> {
    pub id: Option<i64>,
    pub subject_id: i64,
    pub author_id: PersonId,
    pub action: A,
    pub text: Option<String>,
    pub date: NaiveDate,
}

pub type ApplicationComment = Comment<ApplicationAction>;
pub type OvertimeComment = Comment<OvertimeAction>;

impl<A> Comment<A> {
    pub fn builder() -> CommentBuilder<A> {
        CommentBuilder {
            subject_id: None,
            author_id: None,
            action: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentBuilder<A> {
    subject_id: Option<i64>,
    author_id: Option<PersonId>,
    action: Option<A>,
    text: Option<String>,
}

impl<A> CommentBuilder<A> {
    pub fn subject_id(mut self, subject_id: i64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn author_id(mut self, author_id: PersonId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    pub fn text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    pub fn build(self, date: NaiveDate) -> AppResult<Comment<A>> {
        let author_id = self
            .author_id
            .ok_or_else(|| AppError::invalid_argument("Comment requires an author"))?;
        let subject_id = self
            .subject_id
            .ok_or_else(|| AppError::invalid_argument("Comment requires the commented record"))?;
        let action = self
            .action
            .ok_or_else(|| AppError::invalid_argument("Comment requires an action"))?;

        if matches!(&self.text, Some(text) if text.trim().is_empty()) {
            return Err(AppError::invalid_argument("Comment text must not be blank"));
        }

        Ok(Comment {
            id: None,
            subject_id,
            author_id,
            action,
            text: self.text,
            date,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub subject_id: i64,
    pub author_id: i64,
    pub action: String,
    pub text: Option<String>,
    pub date: NaiveDate,
}

impl<A> TryFrom<CommentRow> for Comment<A>
where
    A: std::str::FromStr<Err = String>,
{
    type Error = AppError;

    fn try_from(row: CommentRow) -> AppResult<Self> {
        let action = row
            .action
            .parse::<A>()
            .map_err(AppError::internal_server_error_message)?;

        Ok(Comment {
            id: Some(row.id),
            subject_id: row.subject_id,
            author_id: row.author_id,
            action,
            text: row.text,
            date: row.date,
        })
    }
}
