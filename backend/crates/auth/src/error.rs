//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant carries a stable
//! machine code so clients can branch without parsing messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header on a protected request
    #[error("Authorization header required")]
    MissingAuthorization,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization format. Use 'Bearer TOKEN'")]
    MalformedHeader,

    /// Token could not be decoded or is missing required claims
    #[error("Invalid token")]
    MalformedToken,

    /// Signature does not verify, or the token was signed with another algorithm
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is not yet valid")]
    TokenNotYetValid,

    /// Refresh of an expired or tampered token
    #[error("Invalid token or token expired")]
    InvalidToken,

    /// Token is valid but its subject no longer resolves to a user
    #[error("User not found")]
    IdentityNotFound,

    /// Admin guard reached without an authenticated identity
    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Admin access required")]
    InsufficientPrivilege,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// Unknown user name or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UserNameTaken,

    #[error("Email already exists")]
    EmailTaken,

    /// Request body failed validation
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingAuthorization
            | AuthError::MalformedHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::InvalidToken
            | AuthError::IdentityNotFound
            | AuthError::Unauthenticated
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::InsufficientPrivilege => ErrorKind::Forbidden,
            AuthError::RateLimitExceeded { .. } => ErrorKind::TooManyRequests,
            AuthError::UserNameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization | AuthError::MalformedHeader => {
                "MALFORMED_AUTH_HEADER"
            }
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::IdentityNotFound => "IDENTITY_NOT_FOUND",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::InsufficientPrivilege => "INSUFFICIENT_PRIVILEGE",
            AuthError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNameTaken => "USERNAME_TAKEN",
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::Validation(_) => "VALIDATION_FAILED",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures are reported with a generic message; the
    /// detail only goes to the log.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Database(_) | AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let err = AppError::new(self.kind(), message).with_code(self.code());

        match self {
            AuthError::RateLimitExceeded { retry_after_secs } => {
                err.with_retry_after(*retry_after_secs)
            }
            _ => err,
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
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidSignature => {
                tracing::warn!("Token with invalid signature presented");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Auth error");
            }
        }
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
        AuthError::Internal(err.to_string())
    }
}
