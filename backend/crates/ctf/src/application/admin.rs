//! Admin Use Cases
//!
//! User listing and the dashboard statistics.

use std::sync::Arc;

use auth::domain::entity::user::User;
use auth::domain::repository::UserRepository;

use crate::domain::entities::Submission;
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::error::CtfResult;

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> CtfResult<Vec<User>> {
        Ok(self.user_repo.list().await?)
    }
}

/// Recent submission with the names it refers to
///
/// Names are `None` when the user or challenge has since been removed.
#[derive(Debug, Clone)]
pub struct RecentSubmission {
    pub submission: Submission,
    pub username: Option<String>,
    pub challenge_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total_users: u64,
    pub active_challenges: u64,
    pub total_submissions: u64,
    pub recent_submissions: Vec<RecentSubmission>,
}

pub struct DashboardUseCase<C, U>
where
    C: ChallengeRepository + SubmissionRepository,
    U: UserRepository,
{
    ctf_repo: Arc<C>,
    user_repo: Arc<U>,
    recent_limit: u32,
}

impl<C, U> DashboardUseCase<C, U>
where
    C: ChallengeRepository + SubmissionRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn new(ctf_repo: Arc<C>, user_repo: Arc<U>, recent_limit: u32) -> Self {
        Self {
            ctf_repo,
            user_repo,
            recent_limit,
        }
    }

    pub async fn execute(&self) -> CtfResult<Dashboard> {
        let total_users = self.user_repo.count().await?;
        let active_challenges = self.ctf_repo.count_active().await?;
        let total_submissions = SubmissionRepository::count(self.ctf_repo.as_ref()).await?;

        let submissions = self.ctf_repo.recent(self.recent_limit).await?;
        let mut recent_submissions = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let username = self
                .user_repo
                .find_by_id(submission.user_id)
                .await?
                .map(|u| u.user_name.into_inner());
            let challenge_title = self
                .ctf_repo
                .find(submission.challenge_id)
                .await?
                .map(|c| c.title);

            recent_submissions.push(RecentSubmission {
                submission,
                username,
                challenge_title,
            });
        }

        Ok(Dashboard {
            total_users,
            active_challenges,
            total_submissions,
            recent_submissions,
        })
    }
}
