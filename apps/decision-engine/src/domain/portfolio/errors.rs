//! Portfolio validation errors.

use thiserror::Error;

/// Errors raised while constructing a [`Portfolio`](super::Portfolio).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// No positions supplied.
    #[error("Portfolio must contain at least one position")]
    Empty,

    /// A ticker failed validation.
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// The same ticker appears twice.
    #[error("Duplicate position for ticker {0}")]
    DuplicateTicker(String),

    /// A weight is negative or not finite.
    #[error("Invalid weight {weight} for {ticker}: weights must be finite and non-negative")]
    InvalidWeight {
        /// Offending ticker.
        ticker: String,
        /// Supplied weight.
        weight: f64,
    },

    /// All weights are zero.
    #[error("Portfolio weights sum to zero")]
    ZeroWeightSum,

    /// Weights do not sum to one and the policy forbids normalization.
    #[error("Portfolio weights sum to {sum:.6}, expected 1.0 within tolerance")]
    WeightsDoNotSumToOne {
        /// Observed weight sum.
        sum: f64,
    },

    /// Total value is zero or negative.
    #[error("Portfolio total value must be positive, got {0}")]
    NonPositiveValue(String),
}
