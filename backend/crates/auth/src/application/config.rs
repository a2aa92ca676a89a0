//! Application Configuration
//!
//! Configuration for the Auth application layer. Values come from
//! environment parsing in the binary; defaults match a local dev setup.

use std::fmt;
use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

/// Signing secret used when none is configured
///
/// Anything signed with it is forgeable by whoever reads this file, so it
/// is only fit for local development and tests.
pub const DEFAULT_DEV_JWT_SECRET: &str = "default-secret-change-in-production";

/// Longest session lifetime the server accepts (30 days)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

/// Token issuer claim
pub const DEFAULT_ISSUER: &str = "ctf-backend";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Session token lifetime (24 hours)
    pub token_ttl: Duration,
    /// `iss` claim written and required
    pub issuer: String,
    /// Limiter policy for register/login/refresh
    pub auth_rate_limit: RateLimitConfig,
    /// Key rate limits on the first `X-Forwarded-For` hop
    pub trust_forwarded_for: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(24 * 3600),
            issuer: DEFAULT_ISSUER.to_string(),
            auth_rate_limit: RateLimitConfig::auth_endpoints(),
            trust_forwarded_for: false,
        }
    }
}

impl AuthConfig {
    /// Create config for development (default secret)
    pub fn development() -> Self {
        Self::default()
    }

    /// Create config with an explicit signing secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// True when tokens are signed with the built-in development secret
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_DEV_JWT_SECRET
    }

    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl.as_secs()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("issuer", &self.issuer)
            .field("auth_rate_limit", &self.auth_rate_limit)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_is_flagged() {
        assert!(AuthConfig::development().uses_default_secret());
        assert!(!AuthConfig::with_secret("prod-secret").uses_default_secret());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", AuthConfig::with_secret("hunter2-hunter2"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_secs(), 86_400);
        assert_eq!(config.issuer, "ctf-backend");
        assert_eq!(config.auth_rate_limit.max_requests, 10);
    }
}
