//! Position value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Ticker;

/// A single holding expressed as a share of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument ticker.
    pub ticker: Ticker,
    /// Fraction of total portfolio value (0.0 to 1.0 once validated).
    pub weight: f64,
    /// Cost basis in base currency, when known.
    #[serde(default)]
    pub cost_basis: Option<Decimal>,
    /// Days the position has been held, when known.
    #[serde(default)]
    pub days_held: Option<u32>,
}

impl Position {
    /// Create a position without cost basis information.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
            cost_basis: None,
            days_held: None,
        }
    }

    /// Attach a cost basis.
    #[must_use]
    pub const fn with_cost_basis(mut self, cost_basis: Decimal) -> Self {
        self.cost_basis = Some(cost_basis);
        self
    }

    /// Attach the holding duration in days.
    #[must_use]
    pub const fn with_days_held(mut self, days: u32) -> Self {
        self.days_held = Some(days);
        self
    }
}
