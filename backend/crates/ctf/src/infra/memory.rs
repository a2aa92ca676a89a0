//! In-Memory Repository Implementation
//!
//! Used when no database is configured and by tests. Challenges and
//! submissions share one lock so the one-solve rule holds under
//! concurrent submissions.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{ChallengeId, SubmissionId, UserId};
use tokio::sync::RwLock;

use crate::domain::entities::{Challenge, ChallengePatch, NewChallenge, NewSubmission, Submission};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::error::{CtfError, CtfResult};

struct ChallengeRecord {
    challenge: Challenge,
    deleted_at: Option<DateTime<Utc>>,
}

impl ChallengeRecord {
    fn live(&self) -> Option<&Challenge> {
        self.deleted_at.is_none().then_some(&self.challenge)
    }
}

#[derive(Default)]
struct CtfTables {
    challenges: BTreeMap<ChallengeId, ChallengeRecord>,
    last_challenge_id: i64,
    submissions: Vec<Submission>,
    last_submission_id: i64,
}

impl CtfTables {
    fn live(&self, challenge_id: ChallengeId) -> Option<&Challenge> {
        self.challenges.get(&challenge_id).and_then(ChallengeRecord::live)
    }

    fn has_solved(&self, user_id: UserId, challenge_id: ChallengeId) -> bool {
        self.submissions
            .iter()
            .any(|s| s.is_correct && s.user_id == user_id && s.challenge_id == challenge_id)
    }
}

/// In-memory challenge and submission repository; clones share state
#[derive(Clone, Default)]
pub struct InMemoryCtfRepository {
    tables: Arc<RwLock<CtfTables>>,
}

impl InMemoryCtfRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChallengeRepository for InMemoryCtfRepository {
    async fn create(&self, challenge: &NewChallenge) -> CtfResult<Challenge> {
        let mut tables = self.tables.write().await;
        tables.last_challenge_id += 1;
        let id = ChallengeId::new(tables.last_challenge_id);
        let created = challenge.clone().into_challenge(id);

        tables.challenges.insert(
            id,
            ChallengeRecord {
                challenge: created.clone(),
                deleted_at: None,
            },
        );

        Ok(created)
    }

    async fn find(&self, challenge_id: ChallengeId) -> CtfResult<Option<Challenge>> {
        Ok(self.tables.read().await.live(challenge_id).cloned())
    }

    async fn find_active(&self, challenge_id: ChallengeId) -> CtfResult<Option<Challenge>> {
        let tables = self.tables.read().await;
        Ok(tables
            .live(challenge_id)
            .filter(|c| c.is_active)
            .cloned())
    }

    async fn list_active(&self) -> CtfResult<Vec<Challenge>> {
        let tables = self.tables.read().await;
        Ok(tables
            .challenges
            .values()
            .filter_map(ChallengeRecord::live)
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        challenge_id: ChallengeId,
        patch: &ChallengePatch,
        now: DateTime<Utc>,
    ) -> CtfResult<Option<Challenge>> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables
            .challenges
            .get_mut(&challenge_id)
            .filter(|r| r.deleted_at.is_none())
        else {
            return Ok(None);
        };

        patch.apply(&mut record.challenge, now);
        Ok(Some(record.challenge.clone()))
    }

    async fn delete(&self, challenge_id: ChallengeId, now: DateTime<Utc>) -> CtfResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.challenges.get_mut(&challenge_id) {
            Some(record) if record.deleted_at.is_none() => {
                record.deleted_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_active(&self) -> CtfResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .challenges
            .values()
            .filter_map(ChallengeRecord::live)
            .filter(|c| c.is_active)
            .count() as u64)
    }
}

impl SubmissionRepository for InMemoryCtfRepository {
    async fn record(&self, submission: &NewSubmission) -> CtfResult<Submission> {
        let mut tables = self.tables.write().await;

        if submission.is_correct && tables.has_solved(submission.user_id, submission.challenge_id)
        {
            return Err(CtfError::AlreadySolved);
        }

        tables.last_submission_id += 1;
        let id = SubmissionId::new(tables.last_submission_id);
        let recorded = submission.clone().into_submission(id);
        tables.submissions.push(recorded.clone());

        Ok(recorded)
    }

    async fn has_solved(&self, user_id: UserId, challenge_id: ChallengeId) -> CtfResult<bool> {
        Ok(self.tables.read().await.has_solved(user_id, challenge_id))
    }

    async fn count(&self) -> CtfResult<u64> {
        Ok(self.tables.read().await.submissions.len() as u64)
    }

    async fn recent(&self, limit: u32) -> CtfResult<Vec<Submission>> {
        let tables = self.tables.read().await;
        let mut recent: Vec<Submission> = tables.submissions.clone();
        recent.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Flag, Points};

    fn new_challenge(title: &str, is_active: bool) -> NewChallenge {
        NewChallenge {
            title: title.into(),
            description: String::new(),
            category: "misc".into(),
            points: Points::new(50).unwrap(),
            flag: Flag::new("CTF{x}").unwrap(),
            hint: String::new(),
            file_url: None,
            is_active,
            created_at: Utc::now(),
        }
    }

    fn attempt(user: i64, challenge: i64, is_correct: bool) -> NewSubmission {
        NewSubmission {
            user_id: UserId::new(user),
            challenge_id: ChallengeId::new(challenge),
            flag: "CTF{x}".into(),
            is_correct,
            ip_address: Some("127.0.0.1".into()),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_inactive_and_deleted_are_hidden() {
        let repo = InMemoryCtfRepository::new();
        let a = repo.create(&new_challenge("a", true)).await.unwrap();
        let b = repo.create(&new_challenge("b", false)).await.unwrap();
        let c = repo.create(&new_challenge("c", true)).await.unwrap();

        assert!(repo.delete(c.id, Utc::now()).await.unwrap());
        assert!(!repo.delete(c.id, Utc::now()).await.unwrap());

        let active: Vec<ChallengeId> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(active, vec![a.id]);
        assert_eq!(repo.count_active().await.unwrap(), 1);

        assert!(repo.find(b.id).await.unwrap().is_some());
        assert!(repo.find_active(b.id).await.unwrap().is_none());
        assert!(repo.find(c.id).await.unwrap().is_none());
        assert!(
            repo.update(c.id, &ChallengePatch::default(), Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_second_correct_submission_refused() {
        let repo = InMemoryCtfRepository::new();

        repo.record(&attempt(1, 1, false)).await.unwrap();
        repo.record(&attempt(1, 1, true)).await.unwrap();
        assert!(matches!(
            repo.record(&attempt(1, 1, true)).await,
            Err(CtfError::AlreadySolved)
        ));

        // Wrong answers are still recorded, and other users are unaffected
        repo.record(&attempt(1, 1, false)).await.unwrap();
        repo.record(&attempt(2, 1, true)).await.unwrap();

        assert!(repo.has_solved(UserId::new(1), ChallengeId::new(1)).await.unwrap());
        assert!(!repo.has_solved(UserId::new(3), ChallengeId::new(1)).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_correct_submissions_record_once() {
        let repo = InMemoryCtfRepository::new();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.record(&attempt(1, 1, true)).await.is_ok() })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }

    #[tokio::test]
    async fn test_recent_newest_first() {
        let repo = InMemoryCtfRepository::new();
        for challenge in 1..=5 {
            repo.record(&attempt(1, challenge, false)).await.unwrap();
        }

        let recent = repo.recent(3).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|s| s.id.value()).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }
}
