//! Portfolio aggregate.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{PortfolioError, Position};
use crate::domain::decision::{Action, TradeDirection};
use crate::domain::shared::Ticker;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-4;

/// What to do with weights that do not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightPolicy {
    /// Divide every weight by the sum.
    #[default]
    Normalize,
    /// Reject the portfolio.
    Reject,
}

/// A validated portfolio.
///
/// Invariants (checked in [`Portfolio::new`]):
/// - at least one position, no duplicate tickers
/// - every weight finite and non-negative
/// - weights sum to 1.0 within [`WEIGHT_TOLERANCE`]
/// - positive total value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    positions: Vec<Position>,
    total_value: Decimal,
    base_currency: String,
}

impl Portfolio {
    /// Build a portfolio, applying `policy` to weights that miss the unit sum.
    ///
    /// # Errors
    ///
    /// Returns a [`PortfolioError`] when any invariant cannot be satisfied.
    pub fn new(
        positions: Vec<Position>,
        total_value: Decimal,
        base_currency: impl Into<String>,
        policy: WeightPolicy,
    ) -> Result<Self, PortfolioError> {
        if positions.is_empty() {
            return Err(PortfolioError::Empty);
        }
        if total_value <= Decimal::ZERO {
            return Err(PortfolioError::NonPositiveValue(total_value.to_string()));
        }

        let mut seen = HashSet::with_capacity(positions.len());
        for position in &positions {
            position
                .ticker
                .validate()
                .map_err(|e| PortfolioError::InvalidTicker(e.to_string()))?;
            if !seen.insert(position.ticker.clone()) {
                return Err(PortfolioError::DuplicateTicker(
                    position.ticker.to_string(),
                ));
            }
            if !position.weight.is_finite() || position.weight < 0.0 {
                return Err(PortfolioError::InvalidWeight {
                    ticker: position.ticker.to_string(),
                    weight: position.weight,
                });
            }
        }

        let sum: f64 = positions.iter().map(|p| p.weight).sum();
        if sum <= 0.0 {
            return Err(PortfolioError::ZeroWeightSum);
        }

        let positions = if (sum - 1.0).abs() <= WEIGHT_TOLERANCE {
            positions
        } else {
            match policy {
                WeightPolicy::Reject => return Err(PortfolioError::WeightsDoNotSumToOne { sum }),
                WeightPolicy::Normalize => positions
                    .into_iter()
                    .map(|mut p| {
                        p.weight /= sum;
                        p
                    })
                    .collect(),
            }
        };

        Ok(Self {
            positions,
            total_value,
            base_currency: base_currency.into(),
        })
    }

    /// Positions in submission order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Total market value in base currency.
    #[must_use]
    pub const fn total_value(&self) -> Decimal {
        self.total_value
    }

    /// Base currency code.
    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Tickers in submission order.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.positions.iter().map(|p| &p.ticker)
    }

    /// Find a position by ticker.
    #[must_use]
    pub fn position(&self, ticker: &Ticker) -> Option<&Position> {
        self.positions.iter().find(|p| &p.ticker == ticker)
    }

    /// Whether the portfolio holds `ticker` (at any weight).
    #[must_use]
    pub fn holds(&self, ticker: &Ticker) -> bool {
        self.position(ticker).is_some()
    }

    /// Weight of `ticker`, zero when absent.
    #[must_use]
    pub fn weight_of(&self, ticker: &Ticker) -> f64 {
        self.position(ticker).map_or(0.0, |p| p.weight)
    }

    /// Sum of weights (1.0 within tolerance).
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.positions.iter().map(|p| p.weight).sum()
    }

    /// Market value of a position.
    #[must_use]
    pub fn market_value(&self, position: &Position) -> Decimal {
        Decimal::try_from(position.weight).unwrap_or(Decimal::ZERO) * self.total_value
    }

    /// Total value as `f64` for simulation.
    #[must_use]
    pub fn total_value_f64(&self) -> f64 {
        self.total_value.to_f64().unwrap_or(0.0)
    }

    /// Portfolio after applying a trade action.
    ///
    /// A buy adds `size_percent` points of weight to the ticker (appending it
    /// when absent); a sell removes them, flooring at zero. Weights are then
    /// renormalized to sum to one. Actions that would leave no weight at all,
    /// or sell a ticker that is not held, return the portfolio unchanged.
    #[must_use]
    pub fn apply_action(&self, action: &Action) -> Self {
        let delta = action.size_percent / 100.0;
        if !delta.is_finite() || delta <= 0.0 {
            return self.clone();
        }

        let mut positions = self.positions.clone();
        match (action.direction, positions.iter_mut().find(|p| p.ticker == action.symbol)) {
            (TradeDirection::Buy, Some(position)) => position.weight += delta,
            (TradeDirection::Buy, None) => positions.push(Position::new(action.symbol.clone(), delta)),
            (TradeDirection::Sell, Some(position)) => {
                position.weight = (position.weight - delta).max(0.0);
            }
            (TradeDirection::Sell, None) => return self.clone(),
        }

        let sum: f64 = positions.iter().map(|p| p.weight).sum();
        if sum <= 0.0 {
            return self.clone();
        }
        for position in &mut positions {
            position.weight /= sum;
        }

        Self {
            positions,
            total_value: self.total_value,
            base_currency: self.base_currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::Timing;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn three_sector() -> Portfolio {
        Portfolio::new(
            vec![
                Position::new("AAPL", 0.4),
                Position::new("JPM", 0.3),
                Position::new("XOM", 0.3),
            ],
            dec!(100000),
            "USD",
            WeightPolicy::Reject,
        )
        .unwrap()
    }

    fn action(direction: TradeDirection, symbol: &str, size: f64) -> Action {
        Action {
            direction,
            symbol: Ticker::new(symbol),
            size_percent: size,
            timing: Timing::Immediate,
        }
    }

    #[test]
    fn accepts_weights_within_tolerance() {
        let portfolio = Portfolio::new(
            vec![Position::new("AAPL", 0.50004), Position::new("MSFT", 0.5)],
            dec!(1000),
            "USD",
            WeightPolicy::Reject,
        );
        assert!(portfolio.is_ok());
    }

    #[test]
    fn normalize_policy_rescales_weights() {
        let portfolio = Portfolio::new(
            vec![Position::new("AAPL", 2.0), Position::new("MSFT", 2.0)],
            dec!(1000),
            "USD",
            WeightPolicy::Normalize,
        )
        .unwrap();

        assert!((portfolio.weight_of(&Ticker::new("AAPL")) - 0.5).abs() < 1e-12);
        assert!((portfolio.weight_sum() - 1.0).abs() < WEIGHT_TOLERANCE);
    }

    #[test]
    fn reject_policy_refuses_unnormalized_weights() {
        let err = Portfolio::new(
            vec![Position::new("AAPL", 0.6), Position::new("MSFT", 0.6)],
            dec!(1000),
            "USD",
            WeightPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, PortfolioError::WeightsDoNotSumToOne { .. }));
    }

    #[test]
    fn negative_weight_is_rejected_under_either_policy() {
        for policy in [WeightPolicy::Normalize, WeightPolicy::Reject] {
            let err = Portfolio::new(
                vec![Position::new("AAPL", 1.2), Position::new("MSFT", -0.2)],
                dec!(1000),
                "USD",
                policy,
            )
            .unwrap_err();
            assert!(matches!(err, PortfolioError::InvalidWeight { .. }));
        }
    }

    #[test]
    fn structural_errors() {
        assert_eq!(
            Portfolio::new(vec![], dec!(1), "USD", WeightPolicy::Normalize).unwrap_err(),
            PortfolioError::Empty
        );
        assert!(matches!(
            Portfolio::new(
                vec![Position::new("AAPL", 0.5), Position::new("aapl", 0.5)],
                dec!(1),
                "USD",
                WeightPolicy::Normalize
            )
            .unwrap_err(),
            PortfolioError::DuplicateTicker(_)
        ));
        assert_eq!(
            Portfolio::new(
                vec![Position::new("AAPL", 0.0)],
                dec!(1),
                "USD",
                WeightPolicy::Normalize
            )
            .unwrap_err(),
            PortfolioError::ZeroWeightSum
        );
        assert!(matches!(
            Portfolio::new(
                vec![Position::new("AAPL", 1.0)],
                dec!(0),
                "USD",
                WeightPolicy::Normalize
            )
            .unwrap_err(),
            PortfolioError::NonPositiveValue(_)
        ));
    }

    #[test]
    fn buy_new_ticker_appends_and_renormalizes() {
        let portfolio = three_sector().apply_action(&action(TradeDirection::Buy, "NVDA", 10.0));

        assert_eq!(portfolio.positions().len(), 4);
        assert_eq!(portfolio.positions()[3].ticker.as_str(), "NVDA");
        assert!((portfolio.weight_of(&Ticker::new("NVDA")) - 0.1 / 1.1).abs() < 1e-12);
        assert!((portfolio.weight_sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sell_floors_at_zero() {
        let portfolio = three_sector().apply_action(&action(TradeDirection::Sell, "JPM", 50.0));

        assert_eq!(portfolio.weight_of(&Ticker::new("JPM")), 0.0);
        assert!((portfolio.weight_of(&Ticker::new("AAPL")) - 0.4 / 0.7).abs() < 1e-12);
    }

    #[test]
    fn sell_of_unheld_ticker_is_a_no_op() {
        let original = three_sector();
        let after = original.apply_action(&action(TradeDirection::Sell, "TSLA", 10.0));
        assert_eq!(original, after);
    }

    #[test]
    fn selling_everything_is_ignored() {
        let single = Portfolio::new(
            vec![Position::new("AAPL", 1.0)],
            dec!(1000),
            "USD",
            WeightPolicy::Reject,
        )
        .unwrap();
        let after = single.apply_action(&action(TradeDirection::Sell, "AAPL", 100.0));
        assert_eq!(single, after);
    }

    #[test]
    fn market_value_uses_weight() {
        let portfolio = three_sector();
        let aapl = portfolio.position(&Ticker::new("AAPL")).unwrap();
        assert_eq!(portfolio.market_value(aapl), dec!(40000));
    }

    proptest! {
        #[test]
        fn normalized_weights_sum_to_one(weights in prop::collection::vec(0.0f64..1000.0, 1..12)) {
            prop_assume!(weights.iter().sum::<f64>() > 1e-6);
            let positions = weights
                .iter()
                .enumerate()
                .map(|(i, w)| Position::new(format!("T{i}"), *w))
                .collect();
            let portfolio = Portfolio::new(positions, dec!(1000), "USD", WeightPolicy::Normalize).unwrap();
            prop_assert!((portfolio.weight_sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
            prop_assert!(portfolio.positions().iter().all(|p| p.weight >= 0.0));
        }

        #[test]
        fn actions_preserve_unit_sum(size in 0.1f64..80.0, buy in any::<bool>()) {
            let direction = if buy { TradeDirection::Buy } else { TradeDirection::Sell };
            let after = three_sector().apply_action(&action(direction, "AAPL", size));
            prop_assert!((after.weight_sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
        }
    }
}
