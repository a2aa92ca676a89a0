//! Session Token Service
//!
//! Mints, verifies and refreshes HS256-signed session tokens.
//!
//! ## Validation order
//! 1. Header algorithm must be HS256 (anything else is rejected before the
//!    signature is looked at)
//! 2. Signature, issuer and presence of `exp`/`nbf`/`iat`/`iss`/`sub`
//! 3. `exp` against wall time with zero leeway
//! 4. `exp` and `nbf` again against the injected clock
//!
//! Step 4 repeats step 3 on purpose: it is the check tests can drive, and
//! it keeps expiry enforced even if the library's own check is relaxed.

use std::fmt;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kernel::id::UserId;
use platform::clock::SharedClock;

use crate::application::config::AuthConfig;
use crate::domain::entity::claims::SessionClaims;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Session token issuer/validator
///
/// Stateless apart from its keys, so one instance is shared by every
/// request without locking.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: chrono::Duration,
    clock: SharedClock,
}

impl TokenService {
    pub fn new(config: &AuthConfig, clock: SharedClock) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        // nbf is checked against the injected clock below
        validation.validate_nbf = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        // Out-of-range lifetimes make every `issue` fail instead of
        // quietly shrinking to a default
        let ttl = chrono::Duration::from_std(config.token_ttl).unwrap_or_else(|_| {
            tracing::error!(
                ttl_secs = config.token_ttl.as_secs(),
                "Token lifetime is out of range"
            );
            chrono::TimeDelta::MAX
        });

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            issuer: config.issuer.clone(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Mint a token valid from now until now + ttl
    pub fn issue(&self, user_id: UserId, user_name: &str, is_admin: bool) -> AuthResult<String> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("Session token expiry overflows".to_string()))?;
        let claims = SessionClaims {
            user_id,
            username: user_name.to_string(),
            is_admin,
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to sign session token: {e}")))
    }

    /// Verify a token and return its claims
    pub fn validate(&self, token: &str) -> AuthResult<SessionClaims> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| map_jwt_error(e.kind()))?;

        let claims = data.claims;
        let now = self.clock.now().timestamp();

        if !claims.is_live_at(now) {
            return Err(if now >= claims.exp {
                AuthError::TokenExpired
            } else {
                AuthError::TokenNotYetValid
            });
        }

        Ok(claims)
    }

    /// Re-issue a live token with a fresh lifetime
    ///
    /// Only the identity claims carry over; expiry restarts from now.
    pub fn refresh(&self, token: &str) -> AuthResult<String> {
        let claims = self.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh rejected");
            AuthError::InvalidToken
        })?;

        self.issue(claims.user_id, &claims.username, claims.is_admin)
    }
}

fn map_jwt_error(kind: &JwtErrorKind) -> AuthError {
    match kind {
        JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
        JwtErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
            AuthError::InvalidSignature
        }
        _ => AuthError::MalformedToken,
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}
