//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Entries are evicted this long after insertion.
    pub ttl: Option<Duration>,

    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Chat configs: read on every message, changed rarely.
    pub fn chat_configs() -> Self {
        Self {
            max_capacity: 5_000,
            ttl: Some(Duration::from_secs(600)), // 10 minutes
            tti: None,
        }
    }

    /// User records. No TTL: a record carries live cooldowns and must only
    /// go away once the user has been idle far longer than any cooldown.
    pub fn users() -> Self {
        Self {
            max_capacity: 100_000,
            ttl: None,
            tti: Some(Duration::from_secs(6 * 3600)), // 6 hours idle
        }
    }

    /// Admin status per (chat, user).
    pub fn admin_status() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: Some(Duration::from_secs(120)), // 2 minutes idle
        }
    }
}
