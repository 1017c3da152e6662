//! Static shock sensitivity tables.
//!
//! Coefficients are the fractional change in an asset's value per unit of
//! normalized shock magnitude: per percentage point for rates, GDP and
//! inflation, per percent move for oil.

use super::Sector;
use crate::domain::decision::{MarketShock, ShockType};

/// Long-end yield target; duration-heavy sectors react more than to the policy rate.
pub const LONG_YIELD_TARGET: &str = "10y_treasury";

/// Sensitivity lookup service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitivityModel;

impl SensitivityModel {
    /// Create the model.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Coefficient for `(shock_type, target, ticker_or_sector)`.
    ///
    /// Unknown tickers, sectors and targets map to 0.0.
    #[must_use]
    pub fn sensitivity(&self, shock_type: ShockType, target: &str, ticker_or_sector: &str) -> f64 {
        Sector::classify(ticker_or_sector)
            .map_or(0.0, |sector| self.sector_sensitivity(shock_type, target, sector))
    }

    /// Coefficient for a known sector.
    #[must_use]
    pub fn sector_sensitivity(&self, shock_type: ShockType, target: &str, sector: Sector) -> f64 {
        target_override(shock_type, target, sector).unwrap_or_else(|| base(shock_type, sector))
    }

    /// Day-0 return adjustment for one asset under a set of shocks.
    #[must_use]
    pub fn return_adjustment(&self, shocks: &[MarketShock], ticker: &str, risk_budget: f64) -> f64 {
        shocks
            .iter()
            .map(|shock| {
                self.sensitivity(shock.shock_type, &shock.target, ticker)
                    * shock.normalized_magnitude()
                    * risk_budget
            })
            .sum()
    }
}

fn target_override(shock_type: ShockType, target: &str, sector: Sector) -> Option<f64> {
    use Sector::{Bonds, RealEstate, Technology, Utilities};

    match (shock_type, target, sector) {
        (ShockType::InterestRate, LONG_YIELD_TARGET, Bonds) => Some(-0.09),
        (ShockType::InterestRate, LONG_YIELD_TARGET, RealEstate) => Some(-0.07),
        (ShockType::InterestRate, LONG_YIELD_TARGET, Utilities) => Some(-0.05),
        (ShockType::InterestRate, LONG_YIELD_TARGET, Technology) => Some(-0.06),
        _ => None,
    }
}

#[allow(clippy::match_same_arms)]
fn base(shock_type: ShockType, sector: Sector) -> f64 {
    use Sector::{
        Bonds, BroadMarket, CommunicationServices, ConsumerDiscretionary, ConsumerStaples, Energy,
        Financials, Healthcare, Industrials, Materials, RealEstate, Technology, Utilities,
    };

    match shock_type {
        ShockType::InterestRate => match sector {
            Technology => -0.05,
            CommunicationServices => -0.04,
            ConsumerDiscretionary => -0.04,
            RealEstate => -0.06,
            Utilities => -0.04,
            Bonds => -0.07,
            Healthcare => -0.02,
            Industrials => -0.02,
            Materials => -0.02,
            ConsumerStaples => -0.01,
            Energy => -0.01,
            BroadMarket => -0.03,
            Financials => 0.02,
        },
        ShockType::Oil => match sector {
            Energy => 0.004,
            Materials => 0.001,
            ConsumerDiscretionary => -0.001,
            Industrials => -0.0005,
            Utilities => -0.0005,
            Technology => -0.0003,
            BroadMarket => -0.0002,
            _ => 0.0,
        },
        ShockType::Gdp => match sector {
            ConsumerDiscretionary => 0.04,
            Industrials => 0.035,
            Technology => 0.03,
            Financials => 0.03,
            Materials => 0.03,
            Energy => 0.025,
            CommunicationServices => 0.025,
            BroadMarket => 0.025,
            RealEstate => 0.02,
            Healthcare => 0.01,
            ConsumerStaples => 0.005,
            Utilities => 0.005,
            Bonds => -0.01,
        },
        ShockType::Inflation => match sector {
            Bonds => -0.05,
            Technology => -0.03,
            ConsumerDiscretionary => -0.025,
            CommunicationServices => -0.02,
            Utilities => -0.02,
            BroadMarket => -0.02,
            RealEstate => -0.01,
            ConsumerStaples => -0.01,
            Healthcare => -0.01,
            Industrials => -0.01,
            Financials => 0.005,
            Materials => 0.01,
            Energy => 0.015,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::ShockUnit;
    use test_case::test_case;

    #[test_case(ShockType::InterestRate, "AAPL", -0.05)]
    #[test_case(ShockType::InterestRate, "JPM", 0.02)]
    #[test_case(ShockType::InterestRate, "XOM", -0.01)]
    #[test_case(ShockType::Oil, "XOM", 0.004)]
    #[test_case(ShockType::Gdp, "financials", 0.03)]
    #[test_case(ShockType::Inflation, "TLT", -0.05)]
    fn base_coefficients(shock_type: ShockType, asset: &str, expected: f64) {
        let model = SensitivityModel::new();
        assert!((model.sensitivity(shock_type, "any", asset) - expected).abs() < 1e-12);
    }

    #[test]
    fn unmapped_is_neutral() {
        let model = SensitivityModel::new();
        assert_eq!(model.sensitivity(ShockType::InterestRate, "policy_rate", "ZZZZ"), 0.0);
        assert_eq!(model.sensitivity(ShockType::Oil, "wti", "JNJ"), 0.0);
    }

    #[test]
    fn long_yield_overrides_bonds() {
        let model = SensitivityModel::new();
        assert_eq!(model.sensitivity(ShockType::InterestRate, LONG_YIELD_TARGET, "TLT"), -0.09);
        assert_eq!(model.sensitivity(ShockType::InterestRate, "policy_rate", "TLT"), -0.07);
    }

    #[test]
    fn adjustment_scales_with_magnitude_and_budget() {
        let model = SensitivityModel::new();
        let shocks = [MarketShock {
            shock_type: ShockType::InterestRate,
            target: "policy_rate".to_string(),
            magnitude: 100.0,
            unit: ShockUnit::BasisPoints,
        }];

        let full = model.return_adjustment(&shocks, "AAPL", 1.0);
        let half = model.return_adjustment(&shocks, "AAPL", 0.5);

        assert!((full + 0.05).abs() < 1e-12);
        assert!((half + 0.025).abs() < 1e-12);
    }
}
