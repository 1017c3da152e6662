//! United Kingdom capital gains tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::TaxRules;
use crate::domain::tax::{HoldingPeriod, IncomeTier, TaxLayer, TaxProfile};

/// Basic-rate and higher-rate CGT; holding period is irrelevant.
#[derive(Debug, Clone, Copy, Default)]
pub struct UkRules;

impl TaxRules for UkRules {
    fn code(&self) -> &'static str {
        "UK"
    }

    fn long_term_threshold_days(&self) -> Option<u32> {
        None
    }

    fn layers(&self, profile: &TaxProfile, _holding: HoldingPeriod, gain: Decimal) -> Vec<TaxLayer> {
        let rate = match profile.income_tier {
            IncomeTier::Low | IncomeTier::Middle => dec!(0.18),
            IncomeTier::High | IncomeTier::Top => dec!(0.24),
        };
        vec![TaxLayer::on_gain("capital_gains", rate, gain)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tax::FilingStatus;

    #[test]
    fn rate_ignores_holding_period() {
        let profile = TaxProfile::new("UK", FilingStatus::Single, IncomeTier::High);
        let short = UkRules.layers(&profile, HoldingPeriod::ShortTerm, dec!(1000));
        let long = UkRules.layers(&profile, HoldingPeriod::LongTerm, dec!(1000));

        assert_eq!(short, long);
        assert_eq!(short[0].amount, dec!(240.00));
        assert_eq!(UkRules.classify_holding(1), HoldingPeriod::LongTerm);
    }
}
