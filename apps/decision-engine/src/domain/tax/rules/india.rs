//! India: listed equity capital gains with surcharge and cess.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::TaxRules;
use crate::domain::tax::{HoldingPeriod, TaxLayer, TaxProfile};

/// STCG/LTCG central tax, surcharge on the tax, cess on tax plus surcharge.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndiaRules;

impl TaxRules for IndiaRules {
    fn code(&self) -> &'static str {
        "IN"
    }

    fn long_term_threshold_days(&self) -> Option<u32> {
        Some(365)
    }

    fn layers(&self, profile: &TaxProfile, holding: HoldingPeriod, gain: Decimal) -> Vec<TaxLayer> {
        let central = match holding {
            HoldingPeriod::ShortTerm => dec!(0.20),
            HoldingPeriod::LongTerm => dec!(0.125),
        };
        let surcharge_share =
            [Decimal::ZERO, Decimal::ZERO, dec!(0.10), dec!(0.15)][profile.income_tier.index()];
        let surcharge = central * surcharge_share;
        let cess = dec!(0.04) * (central + surcharge);

        vec![
            TaxLayer::on_gain("central", central, gain),
            TaxLayer::on_gain("surcharge", surcharge, gain),
            TaxLayer::on_gain("cess", cess, gain),
        ]
    }
}
