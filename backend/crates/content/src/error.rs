//! Content Error Types
//!
//! Content-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Content-specific result type alias
pub type ContentResult<T> = Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    /// Missing required field
    #[error("{0}")]
    Validation(String),

    /// No row with the requested id or slug
    #[error("{0}")]
    NotFound(&'static str),

    /// Unique index on `slug` rejected the write
    #[error("Slug already exists")]
    SlugTaken,

    /// Blog post write with an empty user table
    #[error("No valid author found. Please create a user first.")]
    NoValidAuthor,

    /// Caller is anonymous or lacks the capability
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContentError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::Validation(_) => ErrorKind::BadRequest,
            ContentError::NotFound(_) => ErrorKind::NotFound,
            ContentError::SlugTaken => ErrorKind::Conflict,
            ContentError::NoValidAuthor => ErrorKind::UnprocessableEntity,
            ContentError::Auth(e) => e.kind(),
            ContentError::Database(e) => database_kind(e),
            ContentError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Database and internal details stay in the logs
    pub fn to_app_error(&self) -> AppError {
        match self {
            ContentError::Auth(e) => e.to_app_error(),
            ContentError::Database(_) if self.kind() == ErrorKind::ServiceUnavailable => {
                AppError::service_unavailable("Database connection error")
            }
            ContentError::Database(_) | ContentError::Internal(_) => {
                AppError::internal("An unexpected error occurred")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ContentError::Database(e) => tracing::error!(error = %e, "Content database error"),
            ContentError::Internal(msg) => tracing::error!(message = %msg, "Content internal error"),
            ContentError::Auth(e) => tracing::warn!(error = %e, "Content request rejected"),
            ContentError::NoValidAuthor => tracing::warn!("Blog post write without any user"),
            _ => tracing::debug!(error = %self, "Content error"),
        }
    }
}

fn database_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::InternalServerError,
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Internal(format!("JSON column encoding failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ContentError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ContentError::SlugTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ContentError::NoValidAuthor.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ContentError::Auth(AuthError::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ContentError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_auth_message_passes_through() {
        let err = ContentError::from(AuthError::Unauthenticated).to_app_error();
        assert_eq!(err.message(), "Authentication required");
    }

    #[test]
    fn test_database_details_are_not_exposed() {
        let err = ContentError::Database(sqlx::Error::RowNotFound).to_app_error();
        assert_eq!(err.message(), "An unexpected error occurred");
    }
}
