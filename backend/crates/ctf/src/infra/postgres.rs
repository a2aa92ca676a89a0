//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{ChallengeId, SubmissionId, UserId};
use sqlx::PgPool;

use crate::domain::entities::{Challenge, ChallengePatch, NewChallenge, NewSubmission, Submission};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::domain::value_objects::{Flag, Points};
use crate::error::{CtfError, CtfResult};

const CHALLENGE_COLUMNS: &str = "id, title, description, category, points, flag, hint, \
     file_url, is_active, created_at, updated_at";

const SUBMISSION_COLUMNS: &str =
    "id, user_id, challenge_id, flag, is_correct, ip_address, submitted_at";

/// Partial unique index allowing one correct submission per user and challenge
const ONE_SOLVE_INDEX: &str = "submissions_one_solve_idx";

/// PostgreSQL-backed challenge and submission repository
#[derive(Clone)]
pub struct PgCtfRepository {
    pool: PgPool,
}

impl PgCtfRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ChallengeRepository for PgCtfRepository {
    async fn create(&self, challenge: &NewChallenge) -> CtfResult<Challenge> {
        let row = sqlx::query_as::<_, ChallengeRow>(&format!(
            r#"
            INSERT INTO challenges (
                title,
                description,
                category,
                points,
                flag,
                hint,
                file_url,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {CHALLENGE_COLUMNS}
            "#
        ))
        .bind(&challenge.title)
        .bind(&challenge.description)
        .bind(&challenge.category)
        .bind(challenge.points.value())
        .bind(challenge.flag.expose())
        .bind(&challenge.hint)
        .bind(challenge.file_url.as_deref())
        .bind(challenge.is_active)
        .bind(challenge.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_challenge()
    }

    async fn find(&self, challenge_id: ChallengeId) -> CtfResult<Option<Challenge>> {
        let row = sqlx::query_as::<_, ChallengeRow>(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(challenge_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ChallengeRow::into_challenge).transpose()
    }

    async fn find_active(&self, challenge_id: ChallengeId) -> CtfResult<Option<Challenge>> {
        let row = sqlx::query_as::<_, ChallengeRow>(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges \
             WHERE id = $1 AND is_active AND deleted_at IS NULL"
        ))
        .bind(challenge_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ChallengeRow::into_challenge).transpose()
    }

    async fn list_active(&self) -> CtfResult<Vec<Challenge>> {
        let rows = sqlx::query_as::<_, ChallengeRow>(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges \
             WHERE is_active AND deleted_at IS NULL ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ChallengeRow::into_challenge).collect()
    }

    async fn update(
        &self,
        challenge_id: ChallengeId,
        patch: &ChallengePatch,
        now: DateTime<Utc>,
    ) -> CtfResult<Option<Challenge>> {
        let row = sqlx::query_as::<_, ChallengeRow>(&format!(
            r#"
            UPDATE challenges SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                points = COALESCE($5, points),
                flag = COALESCE($6, flag),
                hint = COALESCE($7, hint),
                file_url = COALESCE($8, file_url),
                is_active = COALESCE($9, is_active),
                updated_at = $10
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CHALLENGE_COLUMNS}
            "#
        ))
        .bind(challenge_id.value())
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.category.as_deref())
        .bind(patch.points.map(|p| p.value()))
        .bind(patch.flag.as_ref().map(Flag::expose))
        .bind(patch.hint.as_deref())
        .bind(patch.file_url.as_deref())
        .bind(patch.is_active)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ChallengeRow::into_challenge).transpose()
    }

    async fn delete(&self, challenge_id: ChallengeId, now: DateTime<Utc>) -> CtfResult<bool> {
        let result = sqlx::query(
            "UPDATE challenges SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(challenge_id.value())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active(&self) -> CtfResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM challenges WHERE is_active AND deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }
}

impl SubmissionRepository for PgCtfRepository {
    async fn record(&self, submission: &NewSubmission) -> CtfResult<Submission> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            INSERT INTO submissions (
                user_id,
                challenge_id,
                flag,
                is_correct,
                ip_address,
                submitted_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(submission.user_id.value())
        .bind(submission.challenge_id.value())
        .bind(&submission.flag)
        .bind(submission.is_correct)
        .bind(submission.ip_address.as_deref())
        .bind(submission.submitted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_solve_violation)?;

        Ok(row.into_submission())
    }

    async fn has_solved(&self, user_id: UserId, challenge_id: ChallengeId) -> CtfResult<bool> {
        let solved = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM submissions \
             WHERE user_id = $1 AND challenge_id = $2 AND is_correct)",
        )
        .bind(user_id.value())
        .bind(challenge_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(solved)
    }

    async fn count(&self) -> CtfResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn recent(&self, limit: u32) -> CtfResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions \
             ORDER BY submitted_at DESC, id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SubmissionRow::into_submission).collect())
    }
}

fn map_solve_violation(err: sqlx::Error) -> CtfError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(ONE_SOLVE_INDEX) {
            return CtfError::AlreadySolved;
        }
    }
    CtfError::Database(err)
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ChallengeRow {
    id: i64,
    title: String,
    description: String,
    category: String,
    points: i32,
    flag: String,
    hint: String,
    file_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChallengeRow {
    fn into_challenge(self) -> CtfResult<Challenge> {
        let points = Points::new(self.points).ok_or_else(|| {
            CtfError::Internal(format!("Invalid points for challenge {}", self.id))
        })?;

        Ok(Challenge {
            id: ChallengeId::new(self.id),
            title: self.title,
            description: self.description,
            category: self.category,
            points,
            flag: Flag::from_db(self.flag),
            hint: self.hint,
            file_url: self.file_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: i64,
    user_id: i64,
    challenge_id: i64,
    flag: String,
    is_correct: bool,
    ip_address: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_submission(self) -> Submission {
        Submission {
            id: SubmissionId::new(self.id),
            user_id: UserId::new(self.user_id),
            challenge_id: ChallengeId::new(self.challenge_id),
            flag: self.flag,
            is_correct: self.is_correct,
            ip_address: self.ip_address,
            submitted_at: self.submitted_at,
        }
    }
}
