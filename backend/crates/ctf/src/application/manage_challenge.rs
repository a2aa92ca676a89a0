//! Challenge Management Use Cases
//!
//! Create, update and delete challenges (admin only).

use std::sync::Arc;

use kernel::id::ChallengeId;
use platform::clock::SharedClock;

use crate::domain::entities::{Challenge, ChallengePatch, NewChallenge};
use crate::domain::repository::ChallengeRepository;
use crate::domain::value_objects::{Flag, Points};
use crate::error::{CtfError, CtfResult};

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateChallengeInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub points: i32,
    pub flag: String,
    pub hint: String,
    pub file_url: Option<String>,
    /// Defaults to active
    pub is_active: Option<bool>,
}

pub struct CreateChallengeUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
    clock: SharedClock,
}

impl<C> CreateChallengeUseCase<C>
where
    C: ChallengeRepository + Send + Sync,
{
    pub fn new(challenge_repo: Arc<C>, clock: SharedClock) -> Self {
        Self {
            challenge_repo,
            clock,
        }
    }

    pub async fn execute(&self, input: CreateChallengeInput) -> CtfResult<Challenge> {
        let title = required("title", input.title)?;
        let category = required("category", input.category)?;
        let points = points(input.points)?;
        let flag = Flag::new(input.flag)
            .ok_or_else(|| CtfError::InvalidInput("flag is required".into()))?;

        let challenge = self
            .challenge_repo
            .create(&NewChallenge {
                title,
                description: input.description,
                category,
                points,
                flag,
                hint: input.hint,
                file_url: input.file_url.filter(|url| !url.trim().is_empty()),
                is_active: input.is_active.unwrap_or(true),
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            challenge_id = %challenge.id,
            title = %challenge.title,
            points = %challenge.points,
            "Challenge created"
        );

        Ok(challenge)
    }
}

// ============================================================================
// Update
// ============================================================================

/// Partial update; empty strings count as "not provided"
#[derive(Debug, Clone, Default)]
pub struct UpdateChallengeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points: Option<i32>,
    pub flag: Option<String>,
    pub hint: Option<String>,
    pub file_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateChallengeInput {
    fn into_patch(self) -> CtfResult<ChallengePatch> {
        Ok(ChallengePatch {
            title: provided(self.title),
            description: provided(self.description),
            category: provided(self.category),
            points: self.points.map(points).transpose()?,
            flag: provided(self.flag).and_then(Flag::new),
            hint: provided(self.hint),
            file_url: provided(self.file_url),
            is_active: self.is_active,
        })
    }
}

pub struct UpdateChallengeUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
    clock: SharedClock,
}

impl<C> UpdateChallengeUseCase<C>
where
    C: ChallengeRepository + Send + Sync,
{
    pub fn new(challenge_repo: Arc<C>, clock: SharedClock) -> Self {
        Self {
            challenge_repo,
            clock,
        }
    }

    pub async fn execute(
        &self,
        challenge_id: ChallengeId,
        input: UpdateChallengeInput,
    ) -> CtfResult<Challenge> {
        let patch = input.into_patch()?;

        let challenge = self
            .challenge_repo
            .update(challenge_id, &patch, self.clock.now())
            .await?
            .ok_or(CtfError::ChallengeNotFound)?;

        tracing::info!(challenge_id = %challenge_id, "Challenge updated");

        Ok(challenge)
    }
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteChallengeUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
    clock: SharedClock,
}

impl<C> DeleteChallengeUseCase<C>
where
    C: ChallengeRepository + Send + Sync,
{
    pub fn new(challenge_repo: Arc<C>, clock: SharedClock) -> Self {
        Self {
            challenge_repo,
            clock,
        }
    }

    /// Soft-delete; submissions for the challenge are kept
    pub async fn execute(&self, challenge_id: ChallengeId) -> CtfResult<()> {
        if !self
            .challenge_repo
            .delete(challenge_id, self.clock.now())
            .await?
        {
            return Err(CtfError::ChallengeNotFound);
        }

        tracing::info!(challenge_id = %challenge_id, "Challenge deleted");
        Ok(())
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn required(field: &str, value: String) -> CtfResult<String> {
    if value.trim().is_empty() {
        return Err(CtfError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}

fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn points(value: i32) -> CtfResult<Points> {
    Points::new(value).ok_or_else(|| {
        CtfError::InvalidInput(format!("points must be at least {}", Points::MIN))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_ignores_empty_strings() {
        let patch = UpdateChallengeInput {
            title: Some(String::new()),
            hint: Some("look closer".into()),
            flag: Some(String::new()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();

        assert!(patch.title.is_none());
        assert!(patch.flag.is_none());
        assert_eq!(patch.hint.as_deref(), Some("look closer"));
    }

    #[test]
    fn test_update_input_rejects_non_positive_points() {
        let err = UpdateChallengeInput {
            points: Some(0),
            ..Default::default()
        }
        .into_patch()
        .unwrap_err();
        assert!(matches!(err, CtfError::InvalidInput(_)));
    }

    #[test]
    fn test_required() {
        assert!(required("title", "  ".into()).is_err());
        assert_eq!(required("title", "Warmup".into()).unwrap(), "Warmup");
    }
}
