use std::sync::Arc;

use crate::clock::Clock;
use crate::database::models::{
    ApplicationAction, ApplicationComment, Comment, OvertimeAction, OvertimeComment, Person,
};
use crate::database::repositories::CommentRepository;
use crate::error::AppResult;

/// Writes and lists the comments attached to applications and overtime entries.
#[derive(Clone)]
pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    pub fn new(repository: Arc<dyn CommentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn create_application_comment(
        &self,
        application_id: i64,
        action: ApplicationAction,
        text: Option<String>,
        author: &Person,
    ) -> AppResult<ApplicationComment> {
        let comment = Comment::builder()
            .subject_id(application_id)
            .author_id(author.id)
            .action(action)
            .text(text)
            .build(self.clock.today())?;

        let saved = self.repository.save_application_comment(&comment).await?;
        log::info!(
            "Created comment {:?} with action {} on application {} by person {}",
            saved.id,
            saved.action,
            application_id,
            author.id
        );

        Ok(saved)
    }

    pub async fn get_comments_by_application(&self, application_id: i64) -> AppResult<Vec<ApplicationComment>> {
        Ok(self.repository.find_by_application(application_id).await?)
    }

    pub async fn create_overtime_comment(
        &self,
        overtime_id: i64,
        action: OvertimeAction,
        text: Option<String>,
        author: &Person,
    ) -> AppResult<OvertimeComment> {
        let comment = Comment::builder()
            .subject_id(overtime_id)
            .author_id(author.id)
            .action(action)
            .text(text)
            .build(self.clock.today())?;

        let saved = self.repository.save_overtime_comment(&comment).await?;
        log::info!(
            "Created comment {:?} with action {} on overtime {} by person {}",
            saved.id,
            saved.action,
            overtime_id,
            author.id
        );

        Ok(saved)
    }

    pub async fn get_comments_by_overtime(&self, overtime_id: i64) -> AppResult<Vec<OvertimeComment>> {
        Ok(self.repository.find_by_overtime(overtime_id).await?)
    }
}
