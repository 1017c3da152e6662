//! Price series and the per-request price table.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Interval, MarketDataError};
use crate::domain::portfolio::Portfolio;
use crate::domain::shared::Ticker;

/// One closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar timestamp.
    pub timestamp: DateTime<Utc>,
    /// Closing price.
    pub close: f64,
}

/// Chronological closing prices for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker.
    pub ticker: Ticker,
    /// Bar interval.
    pub interval: Interval,
    /// Points, oldest first.
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series; points are sorted by timestamp.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, interval: Interval, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            ticker: ticker.into(),
            interval,
            points,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Simple returns `close[t] / close[t-1] - 1`.
    ///
    /// Pairs with a non-positive or non-finite close are skipped.
    #[must_use]
    pub fn simple_returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter_map(|w| {
                let (prev, next) = (w[0].close, w[1].close);
                (prev.is_finite() && next.is_finite() && prev > 0.0 && next > 0.0)
                    .then(|| next / prev - 1.0)
            })
            .collect()
    }

    /// Most recent close.
    #[must_use]
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

/// Price series keyed by ticker, with per-ticker failures.
///
/// A table is partial by construction: one ticker failing never removes
/// the others.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    series: BTreeMap<Ticker, Arc<PriceSeries>>,
    failures: BTreeMap<Ticker, MarketDataError>,
}

impl PriceTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fetched series.
    pub fn insert(&mut self, series: Arc<PriceSeries>) {
        self.failures.remove(&series.ticker);
        self.series.insert(series.ticker.clone(), series);
    }

    /// Record a failed fetch.
    pub fn record_failure(&mut self, ticker: Ticker, error: MarketDataError) {
        self.series.remove(&ticker);
        self.failures.insert(ticker, error);
    }

    /// Series for `ticker`.
    #[must_use]
    pub fn get(&self, ticker: &Ticker) -> Option<&PriceSeries> {
        self.series.get(ticker).map(Arc::as_ref)
    }

    /// Fetched series in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.series.values().map(Arc::as_ref)
    }

    /// Failed tickers and their errors.
    #[must_use]
    pub const fn failures(&self) -> &BTreeMap<Ticker, MarketDataError> {
        &self.failures
    }

    /// Number of fetched series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether nothing was fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Fraction of portfolio weight whose history was fetched.
    #[must_use]
    pub fn coverage(&self, portfolio: &Portfolio) -> f64 {
        let total = portfolio.weight_sum();
        if total <= 0.0 {
            return 0.0;
        }
        let covered: f64 = portfolio
            .positions()
            .iter()
            .filter(|p| self.series.get(&p.ticker).is_some_and(|s| !s.is_empty()))
            .map(|p| p.weight)
            .sum();
        covered / total
    }
}
