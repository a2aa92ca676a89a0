//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};

/// Registered account
#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned identifier
    pub user_id: UserId,
    /// Unique login and display name
    pub user_name: UserName,
    /// Unique email
    pub email: Email,
    pub password_hash: HashedPassword,
    /// Sum of points of solved challenges
    pub score: i64,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }
}

/// Account about to be persisted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: UserName,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Materialize with the id chosen by the store
    pub fn into_user(self, user_id: UserId) -> User {
        User {
            user_id,
            user_name: self.user_name,
            email: self.email,
            password_hash: self.password_hash,
            score: 0,
            user_role: self.user_role,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
