//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use platform::clock::SharedClock;
use platform::password::ClearTextPassword;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    clock: SharedClock,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, clock: SharedClock) -> Self {
        Self { user_repo, clock }
    }

    /// Register an ordinary user
    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        self.register(input, UserRole::User).await
    }

    /// Register with an explicit role (used to seed the administrator)
    pub async fn register(&self, input: SignUpInput, role: UserRole) -> AuthResult<User> {
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password
            .hash()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = self
            .user_repo
            .create(&NewUser {
                user_name,
                email,
                password_hash,
                user_role: role,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            role = %user.user_role,
            "User registered"
        );

        Ok(user)
    }
}
