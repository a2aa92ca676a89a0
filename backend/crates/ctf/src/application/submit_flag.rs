//! Submit Flag Use Case

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use kernel::id::{ChallengeId, UserId};
use platform::clock::SharedClock;

use crate::domain::entities::NewSubmission;
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::domain::services::flag_matches;
use crate::error::{CtfError, CtfResult};

/// Input DTO for submit flag
#[derive(Debug, Clone)]
pub struct SubmitFlagInput {
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub flag: String,
    /// Client address recorded with the submission
    pub ip_address: Option<String>,
}

/// Output DTO for submit flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFlagOutput {
    pub correct: bool,
    /// Points awarded; only set for a correct flag
    pub points: Option<i32>,
}

/// Submit Flag Use Case
pub struct SubmitFlagUseCase<C, U>
where
    C: ChallengeRepository + SubmissionRepository,
    U: UserRepository,
{
    ctf_repo: Arc<C>,
    user_repo: Arc<U>,
    clock: SharedClock,
}

impl<C, U> SubmitFlagUseCase<C, U>
where
    C: ChallengeRepository + SubmissionRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn new(ctf_repo: Arc<C>, user_repo: Arc<U>, clock: SharedClock) -> Self {
        Self {
            ctf_repo,
            user_repo,
            clock,
        }
    }

    pub async fn execute(&self, input: SubmitFlagInput) -> CtfResult<SubmitFlagOutput> {
        if input.flag.trim().is_empty() {
            return Err(CtfError::FlagRequired);
        }

        let challenge = self
            .ctf_repo
            .find_active(input.challenge_id)
            .await?
            .ok_or(CtfError::ChallengeNotFound)?;

        if self
            .ctf_repo
            .has_solved(input.user_id, input.challenge_id)
            .await?
        {
            return Err(CtfError::AlreadySolved);
        }

        let correct = flag_matches(&input.flag, &challenge.flag);

        // A concurrent correct submission is refused here by the store
        self.ctf_repo
            .record(&NewSubmission {
                user_id: input.user_id,
                challenge_id: input.challenge_id,
                flag: input.flag,
                is_correct: correct,
                ip_address: input.ip_address,
                submitted_at: self.clock.now(),
            })
            .await?;

        if !correct {
            tracing::debug!(
                user_id = %input.user_id,
                challenge_id = %input.challenge_id,
                "Incorrect flag"
            );
            return Ok(SubmitFlagOutput {
                correct: false,
                points: None,
            });
        }

        let points = challenge.points.value();
        if let Err(e) = self.user_repo.add_score(input.user_id, points).await {
            // The solve is already recorded; the player still gets the answer
            tracing::error!(
                user_id = %input.user_id,
                challenge_id = %input.challenge_id,
                error = %e,
                "Failed to award points"
            );
        }

        tracing::info!(
            user_id = %input.user_id,
            challenge_id = %input.challenge_id,
            points,
            "Challenge solved"
        );

        Ok(SubmitFlagOutput {
            correct: true,
            points: Some(points),
        })
    }
}
