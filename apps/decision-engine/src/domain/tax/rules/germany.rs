//! Germany: Abgeltungsteuer with solidarity surcharge.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::TaxRules;
use crate::domain::tax::{HoldingPeriod, TaxLayer, TaxProfile};

/// Flat 25% withholding plus 5.5% of it as solidarity surcharge.
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanyRules;

impl TaxRules for GermanyRules {
    fn code(&self) -> &'static str {
        "DE"
    }

    fn long_term_threshold_days(&self) -> Option<u32> {
        None
    }

    fn layers(&self, _profile: &TaxProfile, _holding: HoldingPeriod, gain: Decimal) -> Vec<TaxLayer> {
        let flat = dec!(0.25);
        vec![
            TaxLayer::on_gain("flat_withholding", flat, gain),
            TaxLayer::on_gain("solidarity", flat * dec!(0.055), gain),
        ]
    }
}
