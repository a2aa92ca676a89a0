//! CTF Error Types
//!
//! CTF-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Failures coming out of the user store
//! keep their auth code and status.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// CTF-specific result type alias
pub type CtfResult<T> = Result<T, CtfError>;

/// CTF-specific error variants
#[derive(Debug, Error)]
pub enum CtfError {
    /// Path segment is not a positive integer
    #[error("Invalid challenge ID")]
    InvalidChallengeId,

    /// Unknown, deleted or (for players) inactive challenge
    #[error("Challenge not found")]
    ChallengeNotFound,

    /// A correct submission already exists for this user and challenge
    #[error("Challenge already solved")]
    AlreadySolved,

    /// Request body failed validation; the detail is reported separately
    #[error("Invalid input")]
    InvalidInput(String),

    #[error("Flag is required")]
    FlagRequired,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CtfError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CtfError::Auth(e) => e.status_code(),
            other => StatusCode::from_u16(other.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CtfError::InvalidChallengeId | CtfError::InvalidInput(_) | CtfError::FlagRequired => {
                ErrorKind::BadRequest
            }
            CtfError::ChallengeNotFound => ErrorKind::NotFound,
            CtfError::AlreadySolved => ErrorKind::Conflict,
            CtfError::Auth(e) => e.kind(),
            CtfError::Database(_) | CtfError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CtfError::InvalidChallengeId | CtfError::InvalidInput(_) | CtfError::FlagRequired => {
                "VALIDATION_FAILED"
            }
            CtfError::ChallengeNotFound => "CHALLENGE_NOT_FOUND",
            CtfError::AlreadySolved => "ALREADY_SOLVED",
            CtfError::Auth(e) => e.code(),
            CtfError::Database(_) | CtfError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            CtfError::Auth(e) => e.to_app_error(),
            CtfError::Database(_) | CtfError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error").with_code(self.code())
            }
            CtfError::InvalidInput(details) => AppError::new(self.kind(), self.to_string())
                .with_code(self.code())
                .with_details(details.clone()),
            other => AppError::new(other.kind(), other.to_string()).with_code(other.code()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CtfError::Database(e) => {
                tracing::error!(error = %e, "CTF database error");
            }
            CtfError::Internal(msg) => {
                tracing::error!(message = %msg, "CTF internal error");
            }
            _ => {
                tracing::debug!(error = %self, "CTF error");
            }
        }
    }
}

impl From<CtfError> for AppError {
    fn from(err: CtfError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for CtfError {
    fn into_response(self) -> Response {
        match self {
            CtfError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CtfError::InvalidChallengeId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(CtfError::ChallengeNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CtfError::AlreadySolved.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            CtfError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_keep_their_code() {
        let err = CtfError::from(AuthError::InsufficientPrivilege);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "INSUFFICIENT_PRIVILEGE");
        assert_eq!(err.to_string(), "Admin access required");
    }

    #[test]
    fn test_app_error_body() {
        let body = CtfError::AlreadySolved.to_app_error().to_body();
        assert_eq!(body["error"], "Challenge already solved");
        assert_eq!(body["code"], "ALREADY_SOLVED");
        assert_eq!(body["status"], 409);

        let body = CtfError::InvalidInput("points must be at least 1".into())
            .to_app_error()
            .to_body();
        assert_eq!(body["error"], "Invalid input");
        assert_eq!(body["details"], "points must be at least 1");
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let body = CtfError::Internal("pool exhausted".into())
            .to_app_error()
            .to_body();
        assert_eq!(body["error"], "Internal server error");
    }
}
