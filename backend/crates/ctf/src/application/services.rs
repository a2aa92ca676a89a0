//! CTF Services
//!
//! Process-wide CTF components, built once at start-up.

use std::sync::Arc;

use platform::clock::SharedClock;
use platform::rate_limit::SlidingWindowLimiter;

use crate::application::config::CtfConfig;

#[derive(Clone)]
pub struct CtfServices {
    pub config: Arc<CtfConfig>,
    /// Limiter in front of flag submission
    pub flag_limiter: Arc<SlidingWindowLimiter>,
    pub clock: SharedClock,
}

impl CtfServices {
    pub fn new(config: CtfConfig, clock: SharedClock) -> Self {
        Self {
            flag_limiter: Arc::new(SlidingWindowLimiter::new(
                config.flag_rate_limit.clone(),
                clock.clone(),
            )),
            config: Arc::new(config),
            clock,
        }
    }
}
