//! Domain Entities
//!
//! Core business entities for the CTF domain.

use chrono::{DateTime, Utc};
use kernel::id::{ChallengeId, SubmissionId, UserId};

use crate::domain::value_objects::{Flag, Points};

/// Challenge entity
#[derive(Debug, Clone)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub points: Points,
    pub flag: Flag,
    pub hint: String,
    pub file_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Challenge to be stored; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
    pub category: String,
    pub points: Points,
    pub flag: Flag,
    pub hint: String,
    pub file_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewChallenge {
    pub fn into_challenge(self, id: ChallengeId) -> Challenge {
        Challenge {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            points: self.points,
            flag: self.flag,
            hint: self.hint,
            file_url: self.file_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial update of a challenge; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ChallengePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points: Option<Points>,
    pub flag: Option<Flag>,
    pub hint: Option<String>,
    pub file_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ChallengePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.points.is_none()
            && self.flag.is_none()
            && self.hint.is_none()
            && self.file_url.is_none()
            && self.is_active.is_none()
    }

    /// Apply to `challenge`, stamping `updated_at` with `now`
    pub fn apply(&self, challenge: &mut Challenge, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            challenge.title = title.clone();
        }
        if let Some(description) = &self.description {
            challenge.description = description.clone();
        }
        if let Some(category) = &self.category {
            challenge.category = category.clone();
        }
        if let Some(points) = self.points {
            challenge.points = points;
        }
        if let Some(flag) = &self.flag {
            challenge.flag = flag.clone();
        }
        if let Some(hint) = &self.hint {
            challenge.hint = hint.clone();
        }
        if let Some(file_url) = &self.file_url {
            challenge.file_url = Some(file_url.clone());
        }
        if let Some(is_active) = self.is_active {
            challenge.is_active = is_active;
        }
        challenge.updated_at = now;
    }
}

/// A recorded flag attempt, right or wrong
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    /// The flag as submitted
    pub flag: String,
    pub is_correct: bool,
    pub ip_address: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub flag: String,
    pub is_correct: bool,
    pub ip_address: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl NewSubmission {
    pub fn into_submission(self, id: SubmissionId) -> Submission {
        Submission {
            id,
            user_id: self.user_id,
            challenge_id: self.challenge_id,
            flag: self.flag,
            is_correct: self.is_correct,
            ip_address: self.ip_address,
            submitted_at: self.submitted_at,
        }
    }
}
