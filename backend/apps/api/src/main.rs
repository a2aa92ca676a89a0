//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthServices, InMemoryUserRepository, PgUserRepository};
use axum::Router;
use ctf::{CtfServices, InMemoryCtfRepository, PgCtfRepository};
use platform::clock::{SharedClock, SystemClock};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,ctf=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let clock: SharedClock = Arc::new(SystemClock);
    let auth_services = AuthServices::new(&config.auth, clock.clone());
    let ctf_services = CtfServices::new(config.ctf.clone(), clock);

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let users = Arc::new(PgUserRepository::new(pool.clone()));
            let ctf_store = Arc::new(PgCtfRepository::new(pool));
            assemble(&config, users, ctf_store, &auth_services, &ctf_services).await?
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using in-memory storage, data is lost on exit");

            let users = Arc::new(InMemoryUserRepository::new());
            let ctf_store = Arc::new(InMemoryCtfRepository::new());
            assemble(&config, users, ctf_store, &auth_services, &ctf_services).await?
        }
    };

    if let Some(every) = config.sweep_interval {
        app::spawn_sweeper(
            vec![
                auth_services.auth_limiter.clone(),
                ctf_services.flag_limiter.clone(),
            ],
            every,
        );
        tracing::info!(interval_secs = every.as_secs(), "Rate-limit sweep enabled");
    }

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Seed the administrator and build the router over the chosen stores
async fn assemble<U, R>(
    config: &ServerConfig,
    users: Arc<U>,
    ctf_store: Arc<R>,
    auth_services: &AuthServices,
    ctf_services: &CtfServices,
) -> anyhow::Result<Router>
where
    U: auth::domain::repository::UserRepository + Clone + Send + Sync + 'static,
    R: ctf::store::ChallengeRepository
        + ctf::store::SubmissionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    if let Some(seed) = &config.admin {
        app::seed_admin(users.clone(), auth_services, seed).await?;
    }

    Ok(app::build_router(
        ctf_store,
        users,
        auth_services.clone(),
        ctf_services.clone(),
        &config.frontend_origins,
    ))
}
