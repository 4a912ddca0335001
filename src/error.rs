use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown person with id {0}")]
    UnknownPerson(i64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

pub type AppResult<T> = Result<T, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownPerson(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!(
                "Request failed with status {}: {}",
                status_code,
                error_message
            );
        } else {
            log::debug!(
                "Request rejected with status {}: {}",
                status_code,
                error_message
            );
        }

        HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Repositories wrap domain errors in anyhow; keep their original meaning.
        let error = match error.downcast::<AppError>() {
            Ok(app_error) => return app_error,
            Err(error) => error,
        };

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::from(sqlx_err),
            Err(original_error) => {
                log::error!("Unexpected error: {}", original_error);
                AppError::InternalServerError(Some(original_error.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_person_maps_to_not_found_and_names_the_id() {
        let error = AppError::UnknownPerson(42);

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "Unknown person with id 42");
    }

    #[test]
    fn invalid_argument_is_a_bad_request() {
        let error = AppError::invalid_argument("start date after end date");

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn anyhow_wrapped_app_error_keeps_its_variant() {
        let wrapped = anyhow::Error::new(AppError::UnknownPerson(7));

        assert!(matches!(AppError::from(wrapped), AppError::UnknownPerson(7)));
    }

    #[test]
    fn anyhow_message_becomes_internal_server_error() {
        let error = AppError::from(anyhow::anyhow!("boom"));

        assert_eq!(error.to_string(), "Internal server error: boom");
    }
}
