//! Application Assembly
//!
//! Builds the full router from the per-context routers and runs the
//! start-up chores that need the stores.

use std::sync::Arc;
use std::time::Duration;

use auth::application::{SignUpInput, SignUpUseCase};
use auth::domain::repository::UserRepository;
use auth::domain::value_object::user_name::UserName;
use auth::domain::value_object::user_role::UserRole;
use auth::presentation::router::auth_router_generic;
use auth::AuthServices;
use axum::http::{self, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use ctf::CtfServices;
use ctf::presentation::router::ctf_router_generic;
use ctf::store::{ChallengeRepository, SubmissionRepository};
use platform::rate_limit::SlidingWindowLimiter;
use serde::Serialize;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AdminSeed;

#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to CTF Backend API",
        version: "1.0.0",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

/// Assemble the whole HTTP surface over the given stores
pub fn build_router<R, U>(
    ctf_repo: Arc<R>,
    user_repo: Arc<U>,
    auth: AuthServices,
    ctf: CtfServices,
    frontend_origins: &[String],
) -> Router
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest(
            "/api/auth",
            auth_router_generic(user_repo.clone(), auth.clone()),
        )
        .nest("/api", ctf_router_generic(ctf_repo, user_repo, auth, ctf))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_origins))
}

/// Create the configured administrator unless the user name is taken
pub async fn seed_admin<U>(
    users: Arc<U>,
    auth: &AuthServices,
    seed: &AdminSeed,
) -> anyhow::Result<()>
where
    U: UserRepository + Send + Sync + 'static,
{
    let user_name = UserName::new(&seed.username)?;
    if users.exists_by_user_name(&user_name).await? {
        tracing::info!(user_name = %user_name, "Administrator already present");
        return Ok(());
    }

    let admin = SignUpUseCase::new(users, auth.clock.clone())
        .register(
            SignUpInput {
                user_name: seed.username.clone(),
                email: seed.email.clone(),
                password: seed.password.clone(),
            },
            UserRole::Admin,
        )
        .await?;

    tracing::info!(user_id = %admin.user_id, "Administrator seeded");
    Ok(())
}

/// Periodically drop idle rate-limit keys
pub fn spawn_sweeper(
    limiters: Vec<Arc<SlidingWindowLimiter>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed: usize = limiters.iter().map(|l| l.sweep_idle()).sum();
            if removed > 0 {
                tracing::debug!(removed, "Swept idle rate-limit keys");
            }
        }
    })
}
