//! Per-jurisdiction tax rule strategies.

mod germany;
mod india;
mod uk;
mod us;

pub use germany::GermanyRules;
pub use india::IndiaRules;
pub use uk::UkRules;
pub use us::UsRules;

use rust_decimal::Decimal;

use super::{HoldingPeriod, TaxLayer, TaxProfile};

/// A jurisdiction's rate tables and layer composition.
pub trait TaxRules: Send + Sync {
    /// Canonical jurisdiction code.
    fn code(&self) -> &'static str;

    /// Days a position must be held beyond to count as long-term.
    ///
    /// `None` when the holding period does not affect the rate.
    fn long_term_threshold_days(&self) -> Option<u32>;

    /// Layers, in application order, for a realized gain (negative for a loss).
    fn layers(&self, profile: &TaxProfile, holding: HoldingPeriod, gain: Decimal) -> Vec<TaxLayer>;

    /// Holding period for a position held `days_held` days.
    fn classify_holding(&self, days_held: u32) -> HoldingPeriod {
        match self.long_term_threshold_days() {
            Some(threshold) if days_held <= threshold => HoldingPeriod::ShortTerm,
            _ => HoldingPeriod::LongTerm,
        }
    }
}
