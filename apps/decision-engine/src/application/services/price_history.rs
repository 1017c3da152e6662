//! Price History Service
//!
//! Fetches a price series per ticker concurrently, each request bounded by
//! its own timeout, and assembles the results into a partial `PriceTable`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::ports::MarketDataPort;
use crate::domain::market_data::{Interval, MarketDataError, PriceSeries, PriceTable};
use crate::domain::shared::Ticker;
use crate::observability::record_price_fetch;

/// Concurrent per-ticker price fetcher.
#[derive(Debug)]
pub struct PriceHistoryService<M: MarketDataPort> {
    market_data: Arc<M>,
    fetch_timeout: Duration,
}

impl<M: MarketDataPort> Clone for PriceHistoryService<M> {
    fn clone(&self) -> Self {
        Self {
            market_data: Arc::clone(&self.market_data),
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<M: MarketDataPort> PriceHistoryService<M> {
    /// Create a service over `market_data` with a per-ticker timeout.
    #[must_use]
    pub const fn new(market_data: Arc<M>, fetch_timeout: Duration) -> Self {
        Self {
            market_data,
            fetch_timeout,
        }
    }

    /// Fetch every ticker once. A ticker that times out or fails is
    /// recorded in the table's failures; the others are unaffected.
    pub async fn fetch_prices<'a>(
        &self,
        tickers: impl IntoIterator<Item = &'a Ticker>,
        lookback_days: u32,
        interval: Interval,
    ) -> PriceTable {
        let unique: BTreeSet<&Ticker> = tickers.into_iter().collect();
        let timeout_ms = u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX);

        let requests = unique.into_iter().map(|ticker| async move {
            let started = Instant::now();
            let result = match timeout(
                self.fetch_timeout,
                self.market_data
                    .fetch_series_shared(ticker, lookback_days, interval),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(MarketDataError::Timeout {
                    ticker: ticker.to_string(),
                    timeout_ms,
                }),
            };
            (ticker.clone(), result, started.elapsed())
        });

        let mut table = PriceTable::new();
        for (ticker, result, elapsed) in join_all(requests).await {
            match result {
                Ok(series) => {
                    record_price_fetch("ok", elapsed.as_secs_f64());
                    debug!(ticker = %ticker, points = series.len(), "Fetched price series");
                    table.insert(Self::relabel(series, &ticker));
                }
                Err(error) => {
                    let outcome = if matches!(error, MarketDataError::Timeout { .. }) {
                        "timeout"
                    } else {
                        "error"
                    };
                    record_price_fetch(outcome, elapsed.as_secs_f64());
                    warn!(ticker = %ticker, error = %error, "Price fetch failed");
                    table.record_failure(ticker, error);
                }
            }
        }

        table
    }

    /// Key the series by the requested ticker even if the provider
    /// normalized it differently. Copies only when the label changes.
    fn relabel(series: Arc<PriceSeries>, ticker: &Ticker) -> Arc<PriceSeries> {
        if &series.ticker == ticker {
            return series;
        }
        let mut series = Arc::unwrap_or_clone(series);
        series.ticker = ticker.clone();
        Arc::new(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::CachedMarketData;
    use crate::domain::market_data::PricePoint;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    struct ScriptedMarketData;

    fn series(ticker: &Ticker) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = (0..5)
            .map(|i| PricePoint {
                timestamp: start + ChronoDuration::days(i),
                close: 100.0 + i as f64,
            })
            .collect();
        PriceSeries::new(ticker.clone(), Interval::OneDay, points)
    }

    #[async_trait]
    impl MarketDataPort for ScriptedMarketData {
        async fn fetch_series(
            &self,
            ticker: &Ticker,
            _lookback_days: u32,
            _interval: Interval,
        ) -> Result<PriceSeries, MarketDataError> {
            match ticker.as_str() {
                "SLOW" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(series(ticker))
                }
                "GONE" => Err(MarketDataError::SymbolNotFound {
                    symbol: ticker.to_string(),
                }),
                _ => Ok(series(ticker)),
            }
        }
    }

    #[tokio::test]
    async fn one_slow_ticker_does_not_sink_the_rest() {
        let service =
            PriceHistoryService::new(Arc::new(ScriptedMarketData), Duration::from_millis(100));
        let tickers = [Ticker::new("AAPL"), Ticker::new("SLOW"), Ticker::new("GONE")];

        let table = service.fetch_prices(&tickers, 365, Interval::OneDay).await;

        assert_eq!(table.len(), 1);
        assert!(table.get(&Ticker::new("AAPL")).is_some());
        assert!(matches!(
            table.failures().get(&Ticker::new("SLOW")),
            Some(MarketDataError::Timeout { timeout_ms: 100, .. })
        ));
        assert!(matches!(
            table.failures().get(&Ticker::new("GONE")),
            Some(MarketDataError::SymbolNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_tickers_fetch_once() {
        let service =
            PriceHistoryService::new(Arc::new(ScriptedMarketData), Duration::from_secs(1));
        let tickers = [Ticker::new("MSFT"), Ticker::new("MSFT")];

        let table = service.fetch_prices(&tickers, 30, Interval::OneDay).await;

        assert_eq!(table.len(), 1);
        assert!(table.failures().is_empty());
    }

    #[tokio::test]
    async fn cached_series_reach_the_table_without_copying() {
        let cache = Arc::new(CachedMarketData::new(ScriptedMarketData, Duration::from_secs(60)));
        let service = PriceHistoryService::new(Arc::clone(&cache), Duration::from_secs(1));
        let ticker = Ticker::new("AAPL");

        let table = service.fetch_prices([&ticker], 30, Interval::OneDay).await;
        let cached = cache.fetch_shared(&ticker, 30, Interval::OneDay).await.unwrap();

        assert!(std::ptr::eq(table.get(&ticker).unwrap(), cached.as_ref()));
    }

    #[test]
    fn relabel_renames_provider_ticker() {
        let provided = Arc::new(series(&Ticker::new("BRK.B")));
        let relabeled = PriceHistoryService::<ScriptedMarketData>::relabel(
            provided,
            &Ticker::new("BRK-B"),
        );
        assert_eq!(relabeled.ticker.as_str(), "BRK-B");
    }
}
