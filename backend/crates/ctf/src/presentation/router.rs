//! CTF Router

use std::sync::Arc;

use auth::AuthServices;
use auth::PgUserRepository;
use auth::domain::repository::UserRepository;
use auth::presentation::RateLimitState;
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::application::CtfServices;
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::infra::postgres::PgCtfRepository;
use crate::presentation::handlers::{self, CtfAppState};

/// Create the CTF router with PostgreSQL repositories
pub fn ctf_router(
    ctf_repo: PgCtfRepository,
    user_repo: PgUserRepository,
    auth: AuthServices,
    ctf: CtfServices,
) -> Router {
    ctf_router_generic(Arc::new(ctf_repo), Arc::new(user_repo), auth, ctf)
}

/// Create a generic CTF router for any repository implementation
///
/// Browsing and the leaderboard are public. Flag submission needs a
/// bearer token and passes the flag limiter first, so unauthenticated
/// guessing still uses up the client's budget. Everything under `/admin`
/// requires an admin.
pub fn ctf_router_generic<R, U>(
    ctf_repo: Arc<R>,
    user_repo: Arc<U>,
    auth: AuthServices,
    ctf: CtfServices,
) -> Router
where
    R: ChallengeRepository + SubmissionRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let gate = auth.gate(user_repo.clone());
    let flag_limiter = RateLimitState::new(ctf.flag_limiter.clone(), auth.trust_forwarded_for);

    let state = CtfAppState {
        ctf_repo,
        user_repo,
        services: ctf,
        trust_forwarded_for: auth.trust_forwarded_for,
    };

    let public = Router::<CtfAppState<R, U>>::new()
        .route("/challenges", get(handlers::list_challenges::<R, U>))
        .route("/challenges/{id}", get(handlers::get_challenge::<R, U>))
        .route("/leaderboard", get(handlers::leaderboard::<R, U>));

    let submit = flag_limiter.limit(gate.protect(
        Router::<CtfAppState<R, U>>::new()
            .route("/challenges/{id}/submit", post(handlers::submit_flag::<R, U>)),
    ));

    let admin = gate.protect_admin(
        Router::<CtfAppState<R, U>>::new()
            .route(
                "/admin/challenges",
                post(handlers::create_challenge::<R, U>),
            )
            .route(
                "/admin/challenges/{id}",
                put(handlers::update_challenge::<R, U>)
                    .delete(handlers::delete_challenge::<R, U>),
            )
            .route("/admin/users", get(handlers::list_users::<R, U>))
            .route("/admin/dashboard", get(handlers::dashboard::<R, U>)),
    );

    public.merge(submit).merge(admin).with_state(state)
}
