//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::AuthServices;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::RateLimitState;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, services: AuthServices) -> Router {
    auth_router_generic(Arc::new(repo), services)
}

/// Create a generic Auth router for any repository implementation
///
/// `register`, `login` and `refresh` share the auth rate limiter;
/// `profile` requires a bearer token instead.
pub fn auth_router_generic<R>(repo: Arc<R>, services: AuthServices) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let gate = services.gate(repo.clone());
    let limiter = RateLimitState::new(
        services.auth_limiter.clone(),
        services.trust_forwarded_for,
    );

    let state = AuthAppState { repo, services };

    let public = limiter.limit(
        Router::<AuthAppState<R>>::new()
            .route("/register", post(handlers::register::<R>))
            .route("/login", post(handlers::login::<R>))
            .route("/refresh", post(handlers::refresh::<R>)),
    );

    let protected = gate.protect(
        Router::<AuthAppState<R>>::new().route("/profile", get(handlers::profile::<R>)),
    );

    public.merge(protected).with_state(state)
}
