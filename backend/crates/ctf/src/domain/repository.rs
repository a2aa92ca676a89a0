//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{ChallengeId, UserId};

use crate::domain::entities::{Challenge, ChallengePatch, NewChallenge, NewSubmission, Submission};
use crate::error::CtfResult;

/// Challenge repository trait
///
/// Deleted challenges are invisible to every method.
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    async fn create(&self, challenge: &NewChallenge) -> CtfResult<Challenge>;

    /// Find a challenge whether active or not
    async fn find(&self, challenge_id: ChallengeId) -> CtfResult<Option<Challenge>>;

    /// Find a challenge only if it is active
    async fn find_active(&self, challenge_id: ChallengeId) -> CtfResult<Option<Challenge>>;

    /// Active challenges in id order
    async fn list_active(&self) -> CtfResult<Vec<Challenge>>;

    /// Apply `patch`; `None` when the challenge does not exist
    async fn update(
        &self,
        challenge_id: ChallengeId,
        patch: &ChallengePatch,
        now: DateTime<Utc>,
    ) -> CtfResult<Option<Challenge>>;

    /// Soft-delete; false when there was nothing to delete
    async fn delete(&self, challenge_id: ChallengeId, now: DateTime<Utc>) -> CtfResult<bool>;

    async fn count_active(&self) -> CtfResult<u64>;
}

/// Submission repository trait
#[trait_variant::make(SubmissionRepository: Send)]
pub trait LocalSubmissionRepository {
    /// Store a submission
    ///
    /// A correct submission is refused with `AlreadySolved` when the user
    /// already has one for the same challenge; the check and the insert
    /// are atomic.
    async fn record(&self, submission: &NewSubmission) -> CtfResult<Submission>;

    async fn has_solved(&self, user_id: UserId, challenge_id: ChallengeId) -> CtfResult<bool>;

    async fn count(&self) -> CtfResult<u64>;

    /// Most recent first
    async fn recent(&self, limit: u32) -> CtfResult<Vec<Submission>>;
}
