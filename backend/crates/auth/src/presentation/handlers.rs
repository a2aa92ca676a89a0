//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::{AuthServices, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, ProfileResponse, RefreshResponse, RegisterRequest,
    RegisterResponse, UserResponse,
};
use crate::presentation::extractor::CurrentUser;
use crate::presentation::middleware::bearer_token;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub services: AuthServices,
}

/// Turn a body rejection into the common error shape
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.services.clock.clone());
    let user = use_case
        .execute(SignUpInput {
            user_name: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user: UserResponse::summary(&user),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.services.tokens.clone());
    let output = use_case
        .execute(SignInInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token: output.token,
        user: UserResponse::with_score(&output.user),
    }))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
///
/// Takes the current token from the `Authorization` header.
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = bearer_token(&headers)?;
    let token = state.services.tokens.refresh(token)?;

    Ok(Json(RefreshResponse {
        message: "Token refreshed successfully",
        token,
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/auth/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(current): CurrentUser,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = state
        .repo
        .find_by_id(current.user_id)
        .await?
        .ok_or(AuthError::IdentityNotFound)?;

    Ok(Json(ProfileResponse {
        user: UserResponse::full(&user),
    }))
}
