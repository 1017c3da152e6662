//! Market Data Port (Driven Port)
//!
//! Interface for fetching historical price series from external providers.
//! This is a secondary/outbound port used by application services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::market_data::{Interval, MarketDataError, PriceSeries};
use crate::domain::shared::Ticker;

/// Port for fetching historical prices.
///
/// This is a driven (secondary/outbound) port. The infrastructure layer
/// provides implementations (e.g., the in-memory adapter).
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Closing prices for `ticker` over the last `lookback_days` calendar
    /// days at `interval`, oldest first.
    ///
    /// Implementations need not enforce a timeout; callers bound each
    /// request.
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<PriceSeries, MarketDataError>;

    /// Same as [`fetch_series`](Self::fetch_series), returned behind an
    /// `Arc`. Caching adapters override this to hand out their stored copy.
    async fn fetch_series_shared(
        &self,
        ticker: &Ticker,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Arc<PriceSeries>, MarketDataError> {
        Ok(Arc::new(self.fetch_series(ticker, lookback_days, interval).await?))
    }
}
