//! Authorization Gate
//!
//! Turns a bearer token into a request identity: verify the token, then
//! re-read the user so deleted or demoted accounts stop working before
//! their tokens expire.

use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::entity::identity::{AdminUser, AuthenticatedUser};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthGate<U> {
    tokens: Arc<TokenService>,
    users: Arc<U>,
}

// Manual impl so `U` needs no `Clone`.
impl<U> Clone for AuthGate<U> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            users: self.users.clone(),
        }
    }
}

impl<U> AuthGate<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(tokens: Arc<TokenService>, users: Arc<U>) -> Self {
        Self { tokens, users }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Validate `token` and resolve its subject against the live user store
    ///
    /// Role and name come from the stored user, not the token, so a
    /// demotion takes effect immediately. A failing store lookup is
    /// reported as `IdentityNotFound`; it is not retried.
    pub async fn authenticate(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        let claims = self.tokens.validate(token)?;

        let user = match self.users.find_by_id(claims.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(user_id = %claims.user_id, "Token subject no longer exists");
                return Err(AuthError::IdentityNotFound);
            }
            Err(e) => {
                tracing::error!(user_id = %claims.user_id, error = %e, "User lookup failed during authentication");
                return Err(AuthError::IdentityNotFound);
            }
        };

        Ok(AuthenticatedUser {
            user_id: user.user_id,
            user_name: user.user_name.into_inner(),
            is_admin: user.user_role.is_admin(),
        })
    }
}

/// Admin check over an already authenticated identity
///
/// Trusts `user` as given; it performs no verification of its own.
pub fn authorize_admin(user: AuthenticatedUser) -> AuthResult<AdminUser> {
    let user_id = user.user_id;
    AdminUser::try_from(user).inspect_err(|_| {
        tracing::warn!(user_id = %user_id, "Admin access denied");
    })
}
