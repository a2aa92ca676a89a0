//! In-Memory Repository Implementation
//!
//! Used when no database is configured and by tests. All state sits behind
//! one `RwLock`, so uniqueness checks and inserts are atomic.

use std::collections::BTreeMap;
use std::sync::Arc;

use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<UserId, User>,
    last_id: i64,
}

/// In-memory user repository; clones share the same table
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete a user outright
    pub async fn remove(&self, user_id: UserId) -> Option<User> {
        self.table.write().await.rows.remove(&user_id)
    }

    /// Change a user's role in place
    pub async fn set_role(&self, user_id: UserId, role: UserRole) -> bool {
        match self.table.write().await.rows.get_mut(&user_id) {
            Some(user) => {
                user.user_role = role;
                true
            }
            None => false,
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        table.last_id += 1;
        let user_id = UserId::new(table.last_id);
        let created = user.clone().into_user(user_id);
        table.rows.insert(user_id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|u| &u.user_name == user_name)
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.values().any(|u| &u.user_name == user_name))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.values().any(|u| &u.email == email))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn count(&self) -> AuthResult<u64> {
        Ok(self.table.read().await.rows.len() as u64)
    }

    async fn add_score(&self, user_id: UserId, points: i32) -> AuthResult<()> {
        let mut table = self.table.write().await;
        let user = table
            .rows
            .get_mut(&user_id)
            .ok_or(AuthError::IdentityNotFound)?;
        user.score += i64::from(points);
        Ok(())
    }

    async fn top_by_score(&self, limit: u32) -> AuthResult<Vec<User>> {
        let table = self.table.read().await;
        let mut users: Vec<User> = table.rows.values().cloned().collect();
        // Stable sort keeps id order among equal scores
        users.sort_by(|a, b| b.score.cmp(&a.score));
        users.truncate(limit as usize);
        Ok(users)
    }
}
