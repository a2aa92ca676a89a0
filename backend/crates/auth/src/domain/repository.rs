//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// User store
///
/// `create` must reject duplicates itself (`UserNameTaken` / `EmailTaken`)
/// even though sign-up checks first, since two registrations can race.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user and return it with its assigned id
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// All users, oldest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Number of registered users
    async fn count(&self) -> AuthResult<u64>;

    /// Atomically add `points` to the user's score
    async fn add_score(&self, user_id: UserId, points: i32) -> AuthResult<()>;

    /// Highest scores first, ties broken by id
    async fn top_by_score(&self, limit: u32) -> AuthResult<Vec<User>>;
}
