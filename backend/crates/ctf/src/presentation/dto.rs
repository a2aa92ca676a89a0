//! API DTOs (Data Transfer Objects)

use auth::models::UserResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{Dashboard, LeaderboardEntry, RecentSubmission};
use crate::domain::entities::Challenge;

// ============================================================================
// Challenges
// ============================================================================

/// Challenge as shown to clients; the flag is never included
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub points: i32,
    pub hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Challenge> for ChallengeView {
    fn from(c: &Challenge) -> Self {
        Self {
            id: c.id.value(),
            title: c.title.clone(),
            description: c.description.clone(),
            category: c.category.clone(),
            points: c.points.value(),
            hint: c.hint.clone(),
            file_url: c.file_url.clone(),
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeListResponse {
    pub challenges: Vec<ChallengeView>,
    pub total_challenges: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub challenge: ChallengeView,
}

// ============================================================================
// Submit Flag
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitFlagRequest {
    #[serde(default)]
    pub flag: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitFlagResponse {
    pub correct: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
}

// ============================================================================
// Leaderboard
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub username: String,
    pub score: i64,
}

impl From<LeaderboardEntry> for LeaderboardRow {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            username: entry.username,
            score: entry.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardRow>,
}

// ============================================================================
// Admin: challenge management
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChallengeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub points: i32,
    pub flag: String,
    #[serde(default)]
    pub hint: String,
    pub file_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChallengeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub points: Option<i32>,
    pub flag: Option<String>,
    pub hint: Option<String>,
    pub file_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeMutationResponse {
    pub message: &'static str,
    pub challenge: ChallengeView,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ============================================================================
// Admin: users and dashboard
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
    pub total_users: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub total_users: u64,
    pub active_challenges: u64,
    pub total_submissions: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub challenge_id: i64,
    pub challenge_title: Option<String>,
    pub flag: String,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<RecentSubmission> for SubmissionView {
    fn from(recent: RecentSubmission) -> Self {
        let s = recent.submission;
        Self {
            id: s.id.value(),
            user_id: s.user_id.value(),
            username: recent.username,
            challenge_id: s.challenge_id.value(),
            challenge_title: recent.challenge_title,
            flag: s.flag,
            is_correct: s.is_correct,
            ip_address: s.ip_address,
            submitted_at: s.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub statistics: Statistics,
    pub recent_submissions: Vec<SubmissionView>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        Self {
            statistics: Statistics {
                total_users: d.total_users,
                active_challenges: d.active_challenges,
                total_submissions: d.total_submissions,
            },
            recent_submissions: d
                .recent_submissions
                .into_iter()
                .map(SubmissionView::from)
                .collect(),
        }
    }
}
