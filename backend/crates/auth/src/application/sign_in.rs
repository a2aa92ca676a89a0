//! Sign In Use Case
//!
//! Verifies credentials and mints a session token.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// Unknown user and wrong password are indistinguishable to the caller
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::for_verification(input.password);
        if !user.password_hash.verify(&password) {
            tracing::warn!(user_id = %user.user_id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.user_id, user.user_name.as_str(), user.is_admin())?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { token, user })
    }
}
