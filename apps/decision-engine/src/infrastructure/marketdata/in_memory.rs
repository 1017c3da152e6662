//! In-memory market data adapter.
//!
//! Serves a fixed set of series, either supplied directly or generated as a
//! deterministic one-factor random walk for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::ports::MarketDataPort;
use crate::domain::market_data::{Interval, MarketDataError, PricePoint, PriceSeries};
use crate::domain::shared::Ticker;
use crate::domain::simulation::derive_seed;

/// Close of the last synthetic bar (2024-12-31T00:00:00Z).
const SYNTHETIC_END_SECS: i64 = 1_735_603_200;
const SYNTHETIC_START_PRICE: f64 = 100.0;
const SYNTHETIC_DRIFT: f64 = 0.0003;
const SYNTHETIC_MARKET_VOL: f64 = 0.009;
const SYNTHETIC_IDIO_VOL: f64 = 0.011;

/// In-memory `MarketDataPort` implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    series: HashMap<Ticker, PriceSeries>,
}

impl InMemoryMarketData {
    /// Empty adapter; every request fails with `SymbolNotFound`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter serving `series`, keyed by each series' ticker.
    #[must_use]
    pub fn with_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|s| (s.ticker.clone(), s))
                .collect(),
        }
    }

    /// Daily synthetic series of `days + 1` bars for each ticker.
    ///
    /// All tickers load on a shared market factor, so their returns are
    /// positively correlated. The same `seed` and ticker always produce
    /// the same series, whatever the other tickers are.
    #[must_use]
    pub fn synthetic<T>(tickers: impl IntoIterator<Item = T>, days: u32, seed: u64) -> Self
    where
        T: Into<Ticker>,
    {
        let market = uniform_draws(derive_seed(seed, u64::MAX), days);
        let series = tickers
            .into_iter()
            .map(Into::into)
            .map(|ticker: Ticker| {
                let idio = uniform_draws(derive_seed(seed, ticker_key(&ticker)), days);
                synthetic_series(ticker, &market, &idio)
            });
        Self::with_series(series)
    }

    /// Add or replace one series.
    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.ticker.clone(), series);
    }

    /// Number of tickers served.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no tickers are served.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait]
impl MarketDataPort for InMemoryMarketData {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<PriceSeries, MarketDataError> {
        let stored = self
            .series
            .get(ticker)
            .ok_or_else(|| MarketDataError::SymbolNotFound {
                symbol: ticker.to_string(),
            })?;

        if stored.interval != interval {
            return Err(MarketDataError::DataUnavailable {
                message: format!("{ticker} is only available at {}", stored.interval),
            });
        }

        let Some(last) = stored.points.last() else {
            return Ok(stored.clone());
        };
        let cutoff = last.timestamp - Duration::days(i64::from(lookback_days));
        let points = stored
            .points
            .iter()
            .filter(|p| p.timestamp >= cutoff)
            .copied()
            .collect();

        Ok(PriceSeries::new(ticker.clone(), interval, points))
    }
}

/// FNV-1a over the ticker text.
fn ticker_key(ticker: &Ticker) -> u64 {
    ticker
        .as_str()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

/// `count` draws from a zero-mean, unit-variance uniform distribution.
fn uniform_draws(seed: u64, count: u32) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let scale = 3.0_f64.sqrt();
    (0..count)
        .map(|_| rng.random_range(-1.0..1.0) * scale)
        .collect()
}

fn synthetic_series(ticker: Ticker, market: &[f64], idio: &[f64]) -> PriceSeries {
    let end = DateTime::<Utc>::from_timestamp(SYNTHETIC_END_SECS, 0).unwrap_or_default();
    let start = end - Duration::days(market.len() as i64);

    let mut close = SYNTHETIC_START_PRICE;
    let mut points = Vec::with_capacity(market.len() + 1);
    points.push(PricePoint {
        timestamp: start,
        close,
    });
    for (day, (m, e)) in market.iter().zip(idio).enumerate() {
        let daily = SYNTHETIC_DRIFT + SYNTHETIC_MARKET_VOL * m + SYNTHETIC_IDIO_VOL * e;
        close *= 1.0 + daily;
        points.push(PricePoint {
            timestamp: start + Duration::days(day as i64 + 1),
            close,
        });
    }

    PriceSeries::new(ticker, Interval::OneDay, points)
}
