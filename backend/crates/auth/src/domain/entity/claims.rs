//! Session Token Claims

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

/// Claims carried inside a signed session token
///
/// Timestamps are Unix seconds. A claims set is live for
/// `nbf <= now < exp`, and `exp > iat` always holds for minted tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
    /// Issuer, always the configured service name
    pub iss: String,
    /// Subject, the user id rendered as a string
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Whether the claims are live at `now` (Unix seconds)
    #[inline]
    pub fn is_live_at(&self, now: i64) -> bool {
        self.nbf <= now && now < self.exp
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
