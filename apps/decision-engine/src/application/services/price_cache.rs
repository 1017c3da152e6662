//! Read-through price cache.
//!
//! Wraps any [`MarketDataPort`] and keeps fetched series for a fixed TTL,
//! keyed by `(ticker, lookback, interval)`. Entries are immutable and
//! shared through `Arc`; failures are never cached.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::MarketDataPort;
use crate::domain::market_data::{Interval, MarketDataError, PriceSeries};
use crate::domain::shared::Ticker;
use crate::observability::record_cache_lookup;

type CacheKey = (Ticker, u32, Interval);

/// A cached series.
#[derive(Debug, Clone)]
struct CachedSeries {
    series: Arc<PriceSeries>,
    fetched_at: Instant,
}

/// TTL cache in front of a market data provider.
#[derive(Debug)]
pub struct CachedMarketData<P: MarketDataPort> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CachedSeries>>,
}

impl<P: MarketDataPort> CachedMarketData<P> {
    /// Cache `inner` for `ttl`. A zero TTL disables caching.
    #[must_use]
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Wrapped provider.
    #[must_use]
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of live and expired entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries. Misses also prune before inserting.
    pub fn evict_expired(&self) {
        let ttl = self.ttl;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, entry| entry.fetched_at.elapsed() < ttl);
    }

    /// Shared series for the key, fetching on a miss or after expiry.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; failures are not cached.
    pub async fn fetch_shared(
        &self,
        ticker: &Ticker,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Arc<PriceSeries>, MarketDataError> {
        let key = (ticker.clone(), lookback_days, interval);

        if !self.ttl.is_zero() {
            let cached = self
                .entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&key)
                .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
                .map(|entry| Arc::clone(&entry.series));
            record_cache_lookup(cached.is_some());
            if let Some(series) = cached {
                debug!(ticker = %ticker, "Price cache hit");
                return Ok(series);
            }
        }

        let series = Arc::new(
            self.inner
                .fetch_series(ticker, lookback_days, interval)
                .await?,
        );

        if !self.ttl.is_zero() {
            let ttl = self.ttl;
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
            entries.insert(
                key,
                CachedSeries {
                    series: Arc::clone(&series),
                    fetched_at: Instant::now(),
                },
            );
        }

        Ok(series)
    }
}

#[async_trait]
impl<P: MarketDataPort> MarketDataPort for CachedMarketData<P> {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<PriceSeries, MarketDataError> {
        let series = self.fetch_shared(ticker, lookback_days, interval).await?;
        Ok(Arc::unwrap_or_clone(series))
    }

    async fn fetch_series_shared(
        &self,
        ticker: &Ticker,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Arc<PriceSeries>, MarketDataError> {
        self.fetch_shared(ticker, lookback_days, interval).await
    }
}
