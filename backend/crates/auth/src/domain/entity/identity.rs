//! Request-scoped identities
//!
//! The authenticate middleware is what inserts an [`AuthenticatedUser`]
//! into request extensions; handlers read it back through the extractors
//! rather than building one. [`AdminUser`] can only be derived from an
//! [`AuthenticatedUser`], which keeps the admin check downstream of
//! authentication.

use kernel::id::UserId;

use crate::error::AuthError;

/// Identity attached to a request after its bearer token verified and the
/// user was re-read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub user_name: String,
    pub is_admin: bool,
}

/// Authenticated identity that passed the admin check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(AuthenticatedUser);

impl AdminUser {
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }

    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }
}

impl TryFrom<AuthenticatedUser> for AdminUser {
    type Error = AuthError;

    fn try_from(user: AuthenticatedUser) -> Result<Self, Self::Error> {
        if user.is_admin {
            Ok(Self(user))
        } else {
            Err(AuthError::InsufficientPrivilege)
        }
    }
}
