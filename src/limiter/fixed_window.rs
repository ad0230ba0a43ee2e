//! Fixed-window rate limiter
//!
//! Windows are created lazily on first check and expire in place: a
//! check after `reset_at` starts a fresh window rather than carrying
//! the old count forward. Expired windows are reclaimed by
//! [`RateLimiter::purge_expired`], which the registry runs on its
//! sweep tick.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A window/max pair describing one rate-limit tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRule {
    /// Window length
    pub window: Duration,
    /// Maximum number of allowed calls per window
    pub max: u32,
}

impl RateRule {
    /// Create a new rule
    pub const fn new(window: Duration, max: u32) -> Self {
        Self { window, max }
    }
}

#[derive(Debug)]
struct RateWindow {
    count: u32,
    reset_at: Instant,
}

/// Generic fixed-window counter keyed by `(scope, key)`
///
/// Sync leaf: the mutex guards short, non-awaiting sections only, so
/// it is safe to call from async contexts.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl RateLimiter {
    /// Create an empty limiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a call for `key` in `scope` is allowed right now
    ///
    /// Counts the call when allowed. Denied calls do not consume budget.
    pub fn check(&self, scope: &str, key: &str, rule: RateRule) -> bool {
        self.check_at(scope, key, rule, Instant::now())
    }

    fn check_at(&self, scope: &str, key: &str, rule: RateRule, now: Instant) -> bool {
        let mut windows = self.windows.lock().expect("limiter mutex poisoned");
        let slot = windows.entry(format!("{}:{}", scope, key));

        let window = slot.or_insert_with(|| RateWindow {
            count: 0,
            reset_at: now + rule.window,
        });

        if now >= window.reset_at {
            window.count = 1;
            window.reset_at = now + rule.window;
            return true;
        }

        if window.count >= rule.max {
            return false;
        }

        window.count += 1;
        true
    }

    /// Drop every window whose reset time has passed
    ///
    /// Bounds the table to keys seen within their current window.
    pub fn purge_expired(&self) {
        let mut windows = self.windows.lock().expect("limiter mutex poisoned");
        let now = Instant::now();
        windows.retain(|_, w| now < w.reset_at);
    }

    /// Number of live windows (expired but unpurged windows included)
    pub fn window_count(&self) -> usize {
        self.windows.lock().expect("limiter mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: RateRule = RateRule::new(Duration::from_secs(60), 100);

    #[test]
    fn test_allows_up_to_max() {
        let limiter = RateLimiter::new();

        for _ in 0..100 {
            assert!(limiter.check("send", "nova", RULE));
        }
    }

    #[test]
    fn test_denies_call_past_max() {
        let limiter = RateLimiter::new();

        for _ in 0..100 {
            assert!(limiter.check("send", "nova", RULE));
        }

        // 101st call in the same window
        assert!(!limiter.check("send", "nova", RULE));
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..100 {
            assert!(limiter.check_at("send", "nova", RULE, start));
        }
        assert!(!limiter.check_at("send", "nova", RULE, start));

        // After the window elapses the next call starts a fresh window
        let later = start + RULE.window;
        assert!(limiter.check_at("send", "nova", RULE, later));

        // And the fresh window counted that call as its first
        for _ in 0..99 {
            assert!(limiter.check_at("send", "nova", RULE, later));
        }
        assert!(!limiter.check_at("send", "nova", RULE, later));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        let rule = RateRule::new(Duration::from_secs(60), 1);

        assert!(limiter.check("send", "nova", rule));
        assert!(!limiter.check("send", "nova", rule));
        assert!(limiter.check("send", "vega", rule));
    }

    #[test]
    fn test_scopes_are_independent() {
        let limiter = RateLimiter::new();
        let rule = RateRule::new(Duration::from_secs(60), 1);

        assert!(limiter.check("send", "nova", rule));
        assert!(limiter.check("chat", "nova", rule));
        assert!(!limiter.check("send", "nova", rule));
    }

    #[test]
    fn test_denied_calls_do_not_consume_budget() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        let rule = RateRule::new(Duration::from_secs(60), 2);

        assert!(limiter.check_at("chat", "c1", rule, start));
        assert!(limiter.check_at("chat", "c1", rule, start));
        assert!(!limiter.check_at("chat", "c1", rule, start));
        assert!(!limiter.check_at("chat", "c1", rule, start));

        // New window: both slots available again
        let later = start + rule.window;
        assert!(limiter.check_at("chat", "c1", rule, later));
        assert!(limiter.check_at("chat", "c1", rule, later));
    }

    #[test]
    fn test_purge_expired() {
        let limiter = RateLimiter::new();
        let rule = RateRule::new(Duration::from_millis(1), 5);

        limiter.check("send", "nova", rule);
        limiter.check("send", "vega", rule);
        assert_eq!(limiter.window_count(), 2);

        std::thread::sleep(Duration::from_millis(5));
        limiter.purge_expired();
        assert_eq!(limiter.window_count(), 0);
    }

    #[test]
    fn test_purge_keeps_live_windows() {
        let limiter = RateLimiter::new();

        limiter.check("send", "nova", RULE);
        limiter.purge_expired();
        assert_eq!(limiter.window_count(), 1);
    }
}
