//! Historical daily return series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::market_data::PriceTable;
use crate::domain::shared::Ticker;

/// Daily simple returns for one ticker, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistory {
    /// Ticker.
    pub ticker: Ticker,
    /// Simple returns, oldest first.
    pub returns: Vec<f64>,
}

impl ReturnHistory {
    /// Create a history from raw returns.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, returns: Vec<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            returns,
        }
    }

    /// Number of return observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// History as of `k` observations ago (most recent `k` dropped).
    #[must_use]
    pub fn truncated(&self, k: usize) -> Self {
        let keep = self.returns.len().saturating_sub(k);
        Self {
            ticker: self.ticker.clone(),
            returns: self.returns[..keep].to_vec(),
        }
    }

    /// The most recent `window` observations (all of them if fewer).
    #[must_use]
    pub fn recent(&self, window: usize) -> &[f64] {
        let start = self.returns.len().saturating_sub(window);
        &self.returns[start..]
    }
}

/// Return histories keyed by ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistorySet {
    histories: BTreeMap<Ticker, ReturnHistory>,
}

impl ReturnHistorySet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive returns from every fetched series.
    #[must_use]
    pub fn from_price_table(table: &PriceTable) -> Self {
        table
            .iter()
            .map(|series| ReturnHistory::new(series.ticker.clone(), series.simple_returns()))
            .collect()
    }

    /// Add or replace a history.
    pub fn insert(&mut self, history: ReturnHistory) {
        self.histories.insert(history.ticker.clone(), history);
    }

    /// History for `ticker`.
    #[must_use]
    pub fn get(&self, ticker: &Ticker) -> Option<&ReturnHistory> {
        self.histories.get(ticker)
    }

    /// Histories in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = &ReturnHistory> {
        self.histories.values()
    }

    /// Number of histories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Every history truncated by `k` observations.
    #[must_use]
    pub fn truncated(&self, k: usize) -> Self {
        self.iter().map(|h| h.truncated(k)).collect()
    }

    /// Whether `ticker` has at least `min_points` observations.
    #[must_use]
    pub fn is_usable(&self, ticker: &Ticker, min_points: usize) -> bool {
        self.get(ticker)
            .is_some_and(|h| !h.is_empty() && h.len() >= min_points)
    }

    /// Length of the most recent window common to every usable history.
    ///
    /// Zero when no history has `min_points` observations.
    #[must_use]
    pub fn aligned_window(&self, min_points: usize) -> usize {
        self.iter()
            .filter(|h| !h.is_empty() && h.len() >= min_points)
            .map(ReturnHistory::len)
            .min()
            .unwrap_or(0)
    }
}

impl FromIterator<ReturnHistory> for ReturnHistorySet {
    fn from_iter<I: IntoIterator<Item = ReturnHistory>>(iter: I) -> Self {
        let mut set = Self::new();
        for history in iter {
            set.insert(history);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_drops_most_recent() {
        let history = ReturnHistory::new("AAPL", vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(history.truncated(1).returns, vec![0.1, 0.2, 0.3]);
        assert!(history.truncated(10).is_empty());
        assert_eq!(history.recent(2), &[0.3, 0.4]);
        assert_eq!(history.recent(10).len(), 4);
    }

    #[test]
    fn aligned_window_ignores_short_histories() {
        let set: ReturnHistorySet = [
            ReturnHistory::new("AAPL", vec![0.0; 50]),
            ReturnHistory::new("JPM", vec![0.0; 30]),
            ReturnHistory::new("NEW", vec![0.0; 5]),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.aligned_window(20), 30);
        assert_eq!(set.aligned_window(60), 0);
        assert!(!set.is_usable(&Ticker::new("NEW"), 20));
        assert!(!set.is_usable(&Ticker::new("MISSING"), 1));
    }
}
