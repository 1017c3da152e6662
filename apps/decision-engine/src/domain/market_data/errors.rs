//! Market data errors.

/// Market data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// Provider did not answer within the per-ticker timeout.
    #[error("Market data request for {ticker} timed out after {timeout_ms}ms")]
    Timeout {
        /// Ticker requested.
        ticker: String,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Data unavailable.
    #[error("Market data unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },

    /// Unsupported bar interval.
    #[error("Invalid interval: {interval}")]
    InvalidInterval {
        /// Interval as given.
        interval: String,
    },
}

impl MarketDataError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::DataUnavailable { .. })
    }
}
