//! Leaderboard Use Case

use std::sync::Arc;

use auth::domain::repository::UserRepository;

use crate::error::CtfResult;

/// One leaderboard row; ranks start at 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub score: i64,
}

pub struct LeaderboardUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    size: u32,
}

impl<U> LeaderboardUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, size: u32) -> Self {
        Self { user_repo, size }
    }

    /// Highest scores first; equal scores keep registration order
    pub async fn execute(&self) -> CtfResult<Vec<LeaderboardEntry>> {
        let users = self.user_repo.top_by_score(self.size).await?;

        Ok(users
            .into_iter()
            .zip(1..)
            .map(|(user, rank)| LeaderboardEntry {
                rank,
                username: user.user_name.into_inner(),
                score: user.score,
            })
            .collect())
    }
}
