//! Auth Services
//!
//! The process-wide auth components, built once at start-up from
//! [`AuthConfig`] and handed to every router that needs them.

use std::sync::Arc;

use platform::clock::SharedClock;
use platform::rate_limit::SlidingWindowLimiter;

use crate::application::config::AuthConfig;
use crate::application::gate::AuthGate;
use crate::application::token::TokenService;
use crate::domain::repository::UserRepository;

#[derive(Clone)]
pub struct AuthServices {
    pub tokens: Arc<TokenService>,
    /// Limiter shared by register, login and refresh
    pub auth_limiter: Arc<SlidingWindowLimiter>,
    pub clock: SharedClock,
    pub trust_forwarded_for: bool,
}

impl AuthServices {
    pub fn new(config: &AuthConfig, clock: SharedClock) -> Self {
        if config.uses_default_secret() {
            tracing::warn!(
                "JWT_SECRET is not set; signing tokens with the insecure development default"
            );
        }

        Self {
            tokens: Arc::new(TokenService::new(config, clock.clone())),
            auth_limiter: Arc::new(SlidingWindowLimiter::new(
                config.auth_rate_limit.clone(),
                clock.clone(),
            )),
            clock,
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    /// Gate over `users` sharing this token service
    pub fn gate<U>(&self, users: Arc<U>) -> AuthGate<U>
    where
        U: UserRepository + Send + Sync + 'static,
    {
        AuthGate::new(self.tokens.clone(), users)
    }
}
