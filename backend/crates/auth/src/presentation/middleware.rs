//! Auth Middleware
//!
//! Guards for protected routes and the per-client rate limiter.
//!
//! Guards are only installed through [`AuthGate::protect`] and
//! [`AuthGate::protect_admin`]; the admin check is private to this module
//! so it cannot be mounted without authentication in front of it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use platform::client::client_key;
use platform::rate_limit::SlidingWindowLimiter;

use crate::application::gate::{AuthGate, authorize_admin};
use crate::domain::entity::identity::AuthenticatedUser;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from `Authorization: Bearer <token>`
///
/// Header problems are reported before any token validation happens.
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Verify the bearer token and attach [`AuthenticatedUser`] to the request
pub async fn authenticate<U>(
    State(gate): State<AuthGate<U>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let token = bearer_token(req.headers())?.to_owned();
    let user = gate.authenticate(&token).await?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require the authenticated identity to be an admin
async fn require_admin(mut req: Request, next: Next) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(AuthError::Unauthenticated)?;

    let admin = authorize_admin(user)?;

    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}

impl<U> AuthGate<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    /// Require a valid bearer token on every route of `router`
    pub fn protect<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(
            self.clone(),
            authenticate::<U>,
        ))
    }

    /// Require a valid bearer token of an admin on every route of `router`
    pub fn protect_admin<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // Layers added later run first: authenticate, then the admin check.
        self.protect(router.route_layer(middleware::from_fn(require_admin)))
    }
}

/// Rate limiter middleware state
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<SlidingWindowLimiter>,
    pub trust_forwarded_for: bool,
}

impl RateLimitState {
    pub fn new(limiter: Arc<SlidingWindowLimiter>, trust_forwarded_for: bool) -> Self {
        Self {
            limiter,
            trust_forwarded_for,
        }
    }

    /// Apply this limiter to every route of `router`
    pub fn limit<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(
            self.clone(),
            enforce_rate_limit,
        ))
    }
}

/// Reject the request with 429 once the client's window is full
pub async fn enforce_rate_limit(
    State(state): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let key = client_key(req.headers(), direct_ip, state.trust_forwarded_for);
    let decision = state.limiter.check(&key);

    if !decision.allowed {
        let retry_after_secs = state.limiter.config().retry_after_secs();
        tracing::warn!(
            client = %key,
            path = %req.uri().path(),
            retry_after_secs,
            "Rate limit exceeded"
        );
        return Err(AuthError::RateLimitExceeded { retry_after_secs });
    }

    Ok(next.run(req).await)
}
