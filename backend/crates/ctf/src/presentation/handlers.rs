//! HTTP Handlers

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::models::UserResponse;
use auth::presentation::{Admin, CurrentUser};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::ChallengeId;

use crate::application::{
    CreateChallengeInput, CreateChallengeUseCase, DashboardUseCase, DeleteChallengeUseCase,
    GetChallengeUseCase, LeaderboardUseCase, ListChallengesUseCase, ListUsersUseCase,
    SubmitFlagInput, SubmitFlagUseCase, UpdateChallengeInput, UpdateChallengeUseCase,
};
use crate::application::CtfServices;
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::error::{CtfError, CtfResult};
use crate::presentation::dto::{
    ChallengeListResponse, ChallengeMutationResponse, ChallengeResponse, ChallengeView,
    CreateChallengeRequest, DashboardResponse, LeaderboardResponse, LeaderboardRow,
    MessageResponse, SubmitFlagRequest, SubmitFlagResponse, UpdateChallengeRequest,
    UsersResponse,
};
use crate::presentation::extractor::ClientIp;

/// Shared state for CTF handlers
#[derive(Clone)]
pub struct CtfAppState<R, U>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub ctf_repo: Arc<R>,
    pub user_repo: Arc<U>,
    pub services: CtfServices,
    pub trust_forwarded_for: bool,
}

fn parse_challenge_id(raw: &str) -> CtfResult<ChallengeId> {
    raw.parse().map_err(|_| CtfError::InvalidChallengeId)
}

fn admin_body<T>(payload: Result<Json<T>, JsonRejection>) -> CtfResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| CtfError::InvalidInput(rejection.body_text()))
}

// ============================================================================
// Challenges (public)
// ============================================================================

/// GET /api/challenges
pub async fn list_challenges<R, U>(
    State(state): State<CtfAppState<R, U>>,
) -> CtfResult<Json<ChallengeListResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let challenges = ListChallengesUseCase::new(state.ctf_repo.clone())
        .execute()
        .await?;

    let challenges: Vec<ChallengeView> = challenges.iter().map(ChallengeView::from).collect();
    Ok(Json(ChallengeListResponse {
        total_challenges: challenges.len(),
        challenges,
    }))
}

/// GET /api/challenges/{id}
pub async fn get_challenge<R, U>(
    State(state): State<CtfAppState<R, U>>,
    Path(id): Path<String>,
) -> CtfResult<Json<ChallengeResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let challenge_id = parse_challenge_id(&id)?;
    let challenge = GetChallengeUseCase::new(state.ctf_repo.clone())
        .execute(challenge_id)
        .await?;

    Ok(Json(ChallengeResponse {
        challenge: ChallengeView::from(&challenge),
    }))
}

// ============================================================================
// Submit Flag
// ============================================================================

/// POST /api/challenges/{id}/submit
pub async fn submit_flag<R, U>(
    State(state): State<CtfAppState<R, U>>,
    CurrentUser(user): CurrentUser,
    ClientIp(client_ip): ClientIp,
    Path(id): Path<String>,
    payload: Result<Json<SubmitFlagRequest>, JsonRejection>,
) -> CtfResult<Json<SubmitFlagResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let challenge_id = parse_challenge_id(&id)?;
    let Json(req) = payload.map_err(|_| CtfError::FlagRequired)?;

    let use_case = SubmitFlagUseCase::new(
        state.ctf_repo.clone(),
        state.user_repo.clone(),
        state.services.clock.clone(),
    );
    let output = use_case
        .execute(SubmitFlagInput {
            user_id: user.user_id,
            challenge_id,
            flag: req.flag,
            ip_address: client_ip.map(|ip| ip.to_string()),
        })
        .await?;

    let message = if output.correct {
        "Correct flag! Points awarded."
    } else {
        "Incorrect flag. Try again!"
    };

    Ok(Json(SubmitFlagResponse {
        correct: output.correct,
        message,
        points: output.points,
    }))
}

// ============================================================================
// Leaderboard
// ============================================================================

/// GET /api/leaderboard
pub async fn leaderboard<R, U>(
    State(state): State<CtfAppState<R, U>>,
) -> CtfResult<Json<LeaderboardResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let entries = LeaderboardUseCase::new(
        state.user_repo.clone(),
        state.services.config.leaderboard_size,
    )
    .execute()
    .await?;

    Ok(Json(LeaderboardResponse {
        leaderboard: entries.into_iter().map(LeaderboardRow::from).collect(),
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /api/admin/challenges
pub async fn create_challenge<R, U>(
    State(state): State<CtfAppState<R, U>>,
    Admin(admin): Admin,
    payload: Result<Json<CreateChallengeRequest>, JsonRejection>,
) -> CtfResult<impl IntoResponse>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let req = admin_body(payload)?;

    let use_case =
        CreateChallengeUseCase::new(state.ctf_repo.clone(), state.services.clock.clone());
    let challenge = use_case
        .execute(CreateChallengeInput {
            title: req.title,
            description: req.description,
            category: req.category,
            points: req.points,
            flag: req.flag,
            hint: req.hint,
            file_url: req.file_url,
            is_active: req.is_active,
        })
        .await?;

    tracing::debug!(admin_id = %admin.user_id(), challenge_id = %challenge.id, "Admin created challenge");

    Ok((
        StatusCode::CREATED,
        Json(ChallengeMutationResponse {
            message: "Challenge created successfully",
            challenge: ChallengeView::from(&challenge),
        }),
    ))
}

/// PUT /api/admin/challenges/{id}
pub async fn update_challenge<R, U>(
    State(state): State<CtfAppState<R, U>>,
    Admin(_admin): Admin,
    Path(id): Path<String>,
    payload: Result<Json<UpdateChallengeRequest>, JsonRejection>,
) -> CtfResult<Json<ChallengeMutationResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let challenge_id = parse_challenge_id(&id)?;
    let req = admin_body(payload)?;

    let use_case =
        UpdateChallengeUseCase::new(state.ctf_repo.clone(), state.services.clock.clone());
    let challenge = use_case
        .execute(
            challenge_id,
            UpdateChallengeInput {
                title: req.title,
                description: req.description,
                category: req.category,
                points: req.points,
                flag: req.flag,
                hint: req.hint,
                file_url: req.file_url,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(ChallengeMutationResponse {
        message: "Challenge updated successfully",
        challenge: ChallengeView::from(&challenge),
    }))
}

/// DELETE /api/admin/challenges/{id}
pub async fn delete_challenge<R, U>(
    State(state): State<CtfAppState<R, U>>,
    Admin(_admin): Admin,
    Path(id): Path<String>,
) -> CtfResult<Json<MessageResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let challenge_id = parse_challenge_id(&id)?;

    DeleteChallengeUseCase::new(state.ctf_repo.clone(), state.services.clock.clone())
        .execute(challenge_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Challenge deleted successfully",
    }))
}

/// GET /api/admin/users
pub async fn list_users<R, U>(
    State(state): State<CtfAppState<R, U>>,
    Admin(_admin): Admin,
) -> CtfResult<Json<UsersResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.user_repo.clone())
        .execute()
        .await?;

    let users: Vec<UserResponse> = users.iter().map(UserResponse::full).collect();
    Ok(Json(UsersResponse {
        total_users: users.len(),
        users,
    }))
}

/// GET /api/admin/dashboard
pub async fn dashboard<R, U>(
    State(state): State<CtfAppState<R, U>>,
    Admin(_admin): Admin,
) -> CtfResult<Json<DashboardResponse>>
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let dashboard = DashboardUseCase::new(
        state.ctf_repo.clone(),
        state.user_repo.clone(),
        state.services.config.recent_submissions,
    )
    .execute()
    .await?;

    Ok(Json(DashboardResponse::from(dashboard)))
}
