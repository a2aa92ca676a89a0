//! Server Configuration
//!
//! Everything the process reads from the environment, parsed once at
//! start-up. Malformed values stop the server instead of falling back.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::config::MAX_TOKEN_TTL;
use ctf::CtfConfig;
use platform::rate_limit::RateLimitConfig;

const DEFAULT_PORT: u16 = 6009;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_SWEEP_SECS: u64 = 600;

/// Administrator created at start-up when missing
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub auth: AuthConfig,
    pub ctf: CtfConfig,
    /// Idle rate-limit key sweep; `None` disables it
    pub sweep_interval: Option<Duration>,
    /// PostgreSQL when set, in-memory storage otherwise
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub admin: Option<AdminSeed>,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;

        let mut auth = match get("JWT_SECRET") {
            Some(secret) => AuthConfig::with_secret(secret),
            None => AuthConfig::development(),
        };
        let ttl_secs = positive(&get, "TOKEN_TTL_SECS", 86_400)?;
        if ttl_secs > MAX_TOKEN_TTL.as_secs() {
            bail!(
                "TOKEN_TTL_SECS must be at most {}: {ttl_secs}",
                MAX_TOKEN_TTL.as_secs()
            );
        }
        auth.token_ttl = Duration::from_secs(ttl_secs);
        auth.auth_rate_limit = rate_limit(
            &get,
            "AUTH_RATE_LIMIT",
            "AUTH_RATE_WINDOW_SECS",
            RateLimitConfig::auth_endpoints(),
        )?;
        auth.trust_forwarded_for = parse_bool(&get, "TRUST_FORWARDED_FOR", false)?;

        let ctf = CtfConfig {
            flag_rate_limit: rate_limit(
                &get,
                "FLAG_RATE_LIMIT",
                "FLAG_RATE_WINDOW_SECS",
                RateLimitConfig::flag_submissions(),
            )?,
            ..CtfConfig::default()
        };

        let sweep_secs: u64 = parse_or(&get, "RATE_LIMIT_SWEEP_SECS", DEFAULT_SWEEP_SECS)?;
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let admin = match (get("ADMIN_USERNAME"), get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => bail!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            port,
            auth,
            ctf,
            sweep_interval,
            database_url: get("DATABASE_URL"),
            frontend_origins,
            admin,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn positive<G>(get: &G, key: &str, default: u64) -> anyhow::Result<u64>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}

fn rate_limit<G>(
    get: &G,
    limit_key: &str,
    window_key: &str,
    default: RateLimitConfig,
) -> anyhow::Result<RateLimitConfig>
where
    G: Fn(&str) -> Option<String>,
{
    let max_requests = positive(get, limit_key, u64::from(default.max_requests))?;
    let max_requests = u32::try_from(max_requests)
        .with_context(|| format!("{limit_key} is too large: {max_requests}"))?;
    let window_secs = positive(get, window_key, default.window.as_secs())?;

    Ok(RateLimitConfig::new(max_requests, window_secs))
}

fn parse_bool<G>(get: &G, key: &str, default: bool) -> anyhow::Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} has an invalid value: {raw:?}"),
    }
}
