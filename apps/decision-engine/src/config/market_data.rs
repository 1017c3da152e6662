//! Market data fetching configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::market_data::Interval;

/// Market data configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Calendar days of history requested per ticker.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Bar interval.
    #[serde(default)]
    pub interval: Interval,
    /// Per-ticker fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Whole-request budget in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Fraction of portfolio weight whose history must be fetched.
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    /// Price cache entry lifetime in seconds (0 disables caching).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            interval: Interval::default(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            min_coverage: default_min_coverage(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl MarketDataConfig {
    /// Per-ticker fetch timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Whole-request budget.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Cache entry lifetime.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

const fn default_lookback_days() -> u32 {
    365
}

const fn default_fetch_timeout_ms() -> u64 {
    5000
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

const fn default_min_coverage() -> f64 {
    0.6
}

const fn default_cache_ttl_secs() -> u64 {
    300
}
