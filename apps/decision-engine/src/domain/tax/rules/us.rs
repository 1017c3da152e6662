//! United States: federal, state and net investment income tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::TaxRules;
use crate::domain::tax::{HoldingPeriod, IncomeTier, TaxLayer, TaxProfile, UsState};

/// Federal rules plus an optional state layer.
#[derive(Debug, Clone, Copy)]
pub struct UsRules {
    state: Option<UsState>,
}

impl UsRules {
    /// Rules for the given state (federal only when `None`).
    #[must_use]
    pub const fn new(state: Option<UsState>) -> Self {
        Self { state }
    }

    fn federal_rate(holding: HoldingPeriod, tier: IncomeTier) -> Decimal {
        let table = match holding {
            HoldingPeriod::LongTerm => [dec!(0), dec!(0.15), dec!(0.15), dec!(0.20)],
            HoldingPeriod::ShortTerm => [dec!(0.12), dec!(0.22), dec!(0.32), dec!(0.37)],
        };
        table[tier.index()]
    }

    fn state_rate(state: UsState, tier: IncomeTier) -> Decimal {
        let table = match state {
            UsState::California => [dec!(0.04), dec!(0.08), dec!(0.093), dec!(0.133)],
            UsState::NewYork => [dec!(0.04), dec!(0.06), dec!(0.0685), dec!(0.109)],
            UsState::Texas | UsState::Florida => [Decimal::ZERO; 4],
        };
        table[tier.index()]
    }
}

impl TaxRules for UsRules {
    fn code(&self) -> &'static str {
        match self.state {
            None => "US",
            Some(UsState::California) => "US-CA",
            Some(UsState::NewYork) => "US-NY",
            Some(UsState::Texas) => "US-TX",
            Some(UsState::Florida) => "US-FL",
        }
    }

    fn long_term_threshold_days(&self) -> Option<u32> {
        Some(365)
    }

    fn layers(&self, profile: &TaxProfile, holding: HoldingPeriod, gain: Decimal) -> Vec<TaxLayer> {
        let tier = profile.income_tier;
        let mut layers = vec![TaxLayer::on_gain(
            "federal",
            Self::federal_rate(holding, tier),
            gain,
        )];

        if let Some(state) = self.state {
            layers.push(TaxLayer::on_gain("state", Self::state_rate(state, tier), gain));
        }

        if tier >= IncomeTier::High {
            layers.push(TaxLayer::on_gain("niit", dec!(0.038), gain));
        }

        layers
    }
}
