//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

// ============================================================================
// Login / Refresh
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub token: String,
}

// ============================================================================
// User views
// ============================================================================

/// Public view of an account; never includes the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserResponse {
    /// Identity fields only
    pub fn summary(user: &User) -> Self {
        Self {
            id: user.user_id.value(),
            username: user.user_name.to_string(),
            email: user.email.to_string(),
            is_admin: user.is_admin(),
            score: None,
            created_at: None,
        }
    }

    pub fn with_score(user: &User) -> Self {
        Self {
            score: Some(user.score),
            ..Self::summary(user)
        }
    }

    pub fn full(user: &User) -> Self {
        Self {
            created_at: Some(user.created_at),
            ..Self::with_score(user)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}
