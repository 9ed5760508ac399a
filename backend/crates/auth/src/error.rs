//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed form field
    #[error("{0}")]
    Validation(String),

    /// Unique index on `users.email` rejected the write
    #[error("Email already exists")]
    EmailTaken,

    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No account for the submitted email. Rendered exactly like
    /// `InvalidCredentials` so the response does not reveal which emails exist.
    #[error("Invalid credentials")]
    UserNotFound,

    /// Admin lookup of a user id that does not exist
    #[error("User not found")]
    NoSuchUser,

    /// No valid session cookie on a request that needs one
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but the role lacks the capability
    #[error("Admin access required")]
    Forbidden,

    /// The OAuth provider refused the exchange or returned unusable data
    #[error("GitHub authentication failed: {0}")]
    OAuthRejected(String),

    /// The OAuth provider could not be reached or is not configured
    #[error("GitHub authentication unavailable: {0}")]
    OAuthUnavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::UserNotFound
            | AuthError::Unauthenticated
            | AuthError::OAuthRejected(_) => ErrorKind::Unauthorized,
            AuthError::NoSuchUser => ErrorKind::NotFound,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::OAuthUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(e) => database_kind(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Database and internal details stay in the logs; the client only sees
    /// a generic message for those.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) if self.kind() == ErrorKind::ServiceUnavailable => {
                AppError::service_unavailable("Database connection error")
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("An unexpected error occurred")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials | AuthError::UserNotFound => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden => {
                tracing::warn!("Non-admin request to admin operation");
            }
            AuthError::OAuthRejected(msg) | AuthError::OAuthUnavailable(msg) => {
                tracing::warn!(reason = %msg, "GitHub login failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
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

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_are_indistinguishable() {
        assert_eq!(
            AuthError::UserNotFound.to_string(),
            AuthError::InvalidCredentials.to_string()
        );
        assert_eq!(
            AuthError::UserNotFound.status_code(),
            AuthError::InvalidCredentials.status_code()
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::NoSuchUser.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_database_details_are_not_exposed() {
        let err = AuthError::Database(sqlx::Error::RowNotFound).to_app_error();
        assert_eq!(err.message(), "An unexpected error occurred");
    }

    #[test]
    fn test_email_taken_message() {
        let err = AuthError::EmailTaken.to_app_error();
        assert_eq!(err.message(), "Email already exists");
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
