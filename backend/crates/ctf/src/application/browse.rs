//! Challenge Browsing Use Cases
//!
//! What players can see: active challenges only.

use std::sync::Arc;

use kernel::id::ChallengeId;

use crate::domain::entities::Challenge;
use crate::domain::repository::ChallengeRepository;
use crate::error::{CtfError, CtfResult};

pub struct ListChallengesUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
}

impl<C> ListChallengesUseCase<C>
where
    C: ChallengeRepository + Send + Sync,
{
    pub fn new(challenge_repo: Arc<C>) -> Self {
        Self { challenge_repo }
    }

    pub async fn execute(&self) -> CtfResult<Vec<Challenge>> {
        self.challenge_repo.list_active().await
    }
}

pub struct GetChallengeUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
}

impl<C> GetChallengeUseCase<C>
where
    C: ChallengeRepository + Send + Sync,
{
    pub fn new(challenge_repo: Arc<C>) -> Self {
        Self { challenge_repo }
    }

    /// Inactive challenges are reported as not found
    pub async fn execute(&self, challenge_id: ChallengeId) -> CtfResult<Challenge> {
        self.challenge_repo
            .find_active(challenge_id)
            .await?
            .ok_or(CtfError::ChallengeNotFound)
    }
}
