//! Registry configuration

use std::time::Duration;

use crate::limiter::RateRule;

/// Minimum stream name length
pub const MIN_NAME_LEN: usize = 3;
/// Maximum stream name length
pub const MAX_NAME_LEN: usize = 30;

/// Registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum lines retained per stream
    pub max_lines: usize,

    /// Maximum chat messages retained per stream
    pub max_chat_messages: usize,

    /// Maximum line text length in chars (longer sends are rejected)
    pub max_line_len: usize,

    /// Maximum chat text length in chars (longer messages are truncated)
    pub max_chat_len: usize,

    /// Maximum concurrent viewers per stream
    pub max_viewers: usize,

    /// Idle time after which an active stream goes offline
    pub inactivity_timeout: Duration,

    /// Interval between sweep ticks
    pub sweep_interval: Duration,

    /// Per-stream broadcast channel capacity; receivers that fall this
    /// far behind observe `Lagged` instead of blocking the publisher
    pub broadcast_capacity: usize,

    /// Activity log capacity
    pub activity_log_capacity: usize,

    /// Per-name line send limit
    pub send_limit: RateRule,

    /// Per-origin connection attempt limit
    pub connect_limit: RateRule,

    /// Per-origin new-stream creation limit
    pub create_limit: RateRule,

    /// Per-connection chat cooldown
    pub chat_cooldown: RateRule,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_lines: 500,
            max_chat_messages: 200,
            max_line_len: 500,
            max_chat_len: 200,
            max_viewers: 1000,
            inactivity_timeout: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(60),
            broadcast_capacity: 256,
            activity_log_capacity: 50,
            send_limit: RateRule::new(Duration::from_secs(60), 100),
            connect_limit: RateRule::new(Duration::from_secs(60), 10),
            create_limit: RateRule::new(Duration::from_secs(3600), 10),
            chat_cooldown: RateRule::new(Duration::from_secs(6), 1),
        }
    }
}

impl RegistryConfig {
    /// Set the per-stream viewer cap
    pub fn max_viewers(mut self, max: usize) -> Self {
        self.max_viewers = max;
        self
    }

    /// Set the inactivity timeout
    pub fn inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    /// Set the sweep interval
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Set the broadcast channel capacity
    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the per-name send limit
    pub fn send_limit(mut self, rule: RateRule) -> Self {
        self.send_limit = rule;
        self
    }

    /// Set the per-origin creation limit
    pub fn create_limit(mut self, rule: RateRule) -> Self {
        self.create_limit = rule;
        self
    }

    /// Set the per-connection chat cooldown
    pub fn chat_cooldown(mut self, rule: RateRule) -> Self {
        self.chat_cooldown = rule;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.max_lines, 500);
        assert_eq!(config.max_chat_messages, 200);
        assert_eq!(config.max_line_len, 500);
        assert_eq!(config.max_chat_len, 200);
        assert_eq!(config.max_viewers, 1000);
        assert_eq!(config.inactivity_timeout, Duration::from_secs(300));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.send_limit.max, 100);
        assert_eq!(config.create_limit.window, Duration::from_secs(3600));
        assert_eq!(config.chat_cooldown.max, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .max_viewers(50)
            .inactivity_timeout(Duration::from_secs(30))
            .sweep_interval(Duration::from_secs(5))
            .broadcast_capacity(32)
            .send_limit(RateRule::new(Duration::from_secs(10), 5));

        assert_eq!(config.max_viewers, 50);
        assert_eq!(config.inactivity_timeout, Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.broadcast_capacity, 32);
        assert_eq!(config.send_limit.max, 5);
    }
}
