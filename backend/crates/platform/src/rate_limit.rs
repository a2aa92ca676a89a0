//! Rate Limiting Infrastructure
//!
//! In-process sliding-window limiter. Each key owns an ordered list of the
//! instants at which requests were admitted; a request is admitted only if
//! fewer than `max_requests` of those instants are younger than `window`.
//!
//! ## Concurrency
//! Windows live in a sharded [`DashMap`]. A check holds the shard's write
//! guard for the whole read-prune-decide-append sequence, so two calls on
//! the same key serialize and can never both take the last slot, while
//! calls on keys in other shards proceed in parallel.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::clock::SharedClock;

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum admitted requests in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Policy for authentication endpoints (10 per minute)
    pub fn auth_endpoints() -> Self {
        Self::new(10, 60)
    }

    /// Policy for flag submissions (5 per minute)
    pub fn flag_submissions() -> Self {
        Self::new(5, 60)
    }

    /// Retry hint returned with every rejection, in whole seconds
    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs()
    }
}

/// Outcome of one rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Slots left in the current window after this decision
    pub remaining: u32,
    /// Set on rejection; always the configured window length
    pub retry_after: Option<Duration>,
}

impl RateLimitDecision {
    fn admitted(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: None,
        }
    }

    fn rejected(window: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after: Some(window),
        }
    }
}

/// Sliding-window rate limiter keyed by an arbitrary string (usually the
/// client address)
///
/// One instance per policy; construct it explicitly and hand it to the
/// routes that need it. A `max_requests` of zero rejects everything.
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    window: chrono::Duration,
    windows: DashMap<String, VecDeque<DateTime<Utc>>>,
    clock: SharedClock,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig, clock: SharedClock) -> Self {
        let window = chrono::Duration::from_std(config.window).unwrap_or(chrono::Duration::MAX);
        Self {
            config,
            window,
            windows: DashMap::new(),
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Admit or reject one request for `key`
    pub fn admit(&self, key: &str) -> bool {
        self.check(key).allowed
    }

    /// Admit or reject one request for `key`, with remaining budget and
    /// retry hint
    ///
    /// Rejected requests are not recorded: only admitted requests consume
    /// the window.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let limit = self.config.max_requests as usize;

        let mut entry = self.windows.entry(key.to_owned()).or_default();
        let timestamps = entry.value_mut();

        prune(timestamps, now, self.window);

        if timestamps.len() >= limit {
            tracing::debug!(
                key,
                limit,
                window_secs = self.config.window.as_secs(),
                "Rate limit window full"
            );
            return RateLimitDecision::rejected(self.config.window);
        }

        timestamps.push_back(now);
        let remaining = limit - timestamps.len();
        RateLimitDecision::admitted(u32::try_from(remaining).unwrap_or(u32::MAX))
    }

    /// Number of timestamps currently stored for `key`
    pub fn occupancy(&self, key: &str) -> usize {
        self.windows.get(key).map(|w| w.len()).unwrap_or(0)
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Drop keys whose every timestamp has aged out of the window
    ///
    /// Such a key behaves exactly like one never seen, so this only bounds
    /// memory. Returns the number of keys removed.
    pub fn sweep_idle(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.windows.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            if timestamps.is_empty() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

/// Discard entries whose age is at least `window`
///
/// Timestamps are appended in admission order, so stale entries are always
/// at the front.
fn prune(timestamps: &mut VecDeque<DateTime<Utc>>, now: DateTime<Utc>, window: chrono::Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.signed_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    fn limiter(max_requests: u32, window_secs: u64) -> (SlidingWindowLimiter, ManualClock) {
        let clock = ManualClock::starting_now();
        let limiter = SlidingWindowLimiter::new(
            RateLimitConfig::new(max_requests, window_secs),
            Arc::new(clock.clone()),
        );
        (limiter, clock)
    }

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let (limiter, _clock) = limiter(3, 60);

        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(limiter.admit("10.0.0.1"));
        assert!(!limiter.admit("10.0.0.1"));
        assert!(!limiter.admit("10.0.0.1"));
    }

    #[test]
    fn test_rejections_do_not_consume_window() {
        let (limiter, _clock) = limiter(4, 60);

        let admitted = (0..9).filter(|_| limiter.admit("k")).count();

        assert_eq!(admitted, 4);
        assert_eq!(limiter.occupancy("k"), 4);
    }

    #[test]
    fn test_admits_again_once_oldest_ages_out() {
        let (limiter, clock) = limiter(2, 60);

        assert!(limiter.admit("k"));
        clock.advance(chrono::Duration::seconds(30));
        assert!(limiter.admit("k"));
        assert!(!limiter.admit("k"));

        // First admit is now 59s old: still inside the window
        clock.advance(chrono::Duration::seconds(29));
        assert!(!limiter.admit("k"));

        // Age equal to the window counts as expired
        clock.advance(chrono::Duration::seconds(1));
        assert!(limiter.admit("k"));
        assert!(!limiter.admit("k"));
    }

    #[test]
    fn test_window_slides_rather_than_resets() {
        let (limiter, clock) = limiter(10, 60);

        for _ in 0..5 {
            assert!(limiter.admit("k"));
        }
        clock.advance(chrono::Duration::seconds(30));
        for _ in 0..5 {
            assert!(limiter.admit("k"));
        }
        assert!(!limiter.admit("k"));

        // Only the first batch has aged out
        clock.advance(chrono::Duration::seconds(30));
        let admitted = (0..10).filter(|_| limiter.admit("k")).count();
        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _clock) = limiter(1, 60);

        assert!(limiter.admit("a"));
        assert!(!limiter.admit("a"));
        assert!(limiter.admit("b"));
    }

    #[test]
    fn test_check_reports_remaining_and_retry_after() {
        let (limiter, _clock) = limiter(2, 60);

        let first = limiter.check("k");
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.retry_after, None);

        let second = limiter.check("k");
        assert_eq!(second.remaining, 0);

        let rejected = limiter.check("k");
        assert!(!rejected.allowed);
        assert_eq!(rejected.retry_after, Some(Duration::from_secs(60)));
        assert_eq!(limiter.config().retry_after_secs(), 60);
    }

    #[test]
    fn test_zero_limit_rejects_everything() {
        let (limiter, _clock) = limiter(0, 60);
        assert!(!limiter.admit("k"));
        assert_eq!(limiter.occupancy("k"), 0);
    }

    #[test]
    fn test_concurrent_admits_on_one_key_never_exceed_limit() {
        let (limiter, _clock) = limiter(10, 60);
        let admitted = AtomicUsize::new(0);
        let rejected = AtomicUsize::new(0);
        let barrier = Barrier::new(100);

        std::thread::scope(|scope| {
            for _ in 0..100 {
                scope.spawn(|| {
                    barrier.wait();
                    if limiter.admit("203.0.113.7") {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    } else {
                        rejected.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), 10);
        assert_eq!(rejected.load(Ordering::SeqCst), 90);
        assert_eq!(limiter.occupancy("203.0.113.7"), 10);
    }

    #[test]
    fn test_concurrent_admits_across_keys() {
        let (limiter, _clock) = limiter(3, 60);

        std::thread::scope(|scope| {
            for i in 0..20 {
                let limiter = &limiter;
                scope.spawn(move || {
                    let key = format!("client-{}", i % 4);
                    for _ in 0..5 {
                        limiter.admit(&key);
                    }
                });
            }
        });

        assert_eq!(limiter.tracked_keys(), 4);
        for i in 0..4 {
            assert_eq!(limiter.occupancy(&format!("client-{i}")), 3);
        }
    }

    #[test]
    fn test_sweep_removes_only_idle_keys() {
        let (limiter, clock) = limiter(5, 60);

        limiter.admit("old");
        clock.advance(chrono::Duration::seconds(45));
        limiter.admit("recent");
        clock.advance(chrono::Duration::seconds(20));

        assert_eq!(limiter.sweep_idle(), 1);
        assert_eq!(limiter.tracked_keys(), 1);
        assert_eq!(limiter.occupancy("old"), 0);
        assert_eq!(limiter.occupancy("recent"), 1);
    }
}
