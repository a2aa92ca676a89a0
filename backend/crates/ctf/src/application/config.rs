//! Application Configuration
//!
//! Configuration for the CTF application layer.

use platform::rate_limit::RateLimitConfig;

/// CTF application configuration
#[derive(Debug, Clone)]
pub struct CtfConfig {
    /// Limiter policy for flag submissions, per client address
    pub flag_rate_limit: RateLimitConfig,
    /// Entries on the public leaderboard
    pub leaderboard_size: u32,
    /// Submissions shown on the admin dashboard
    pub recent_submissions: u32,
}

impl Default for CtfConfig {
    fn default() -> Self {
        Self {
            flag_rate_limit: RateLimitConfig::flag_submissions(),
            leaderboard_size: 10,
            recent_submissions: 10,
        }
    }
}
