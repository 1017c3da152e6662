//! Tax engine: jurisdiction dispatch.

use rust_decimal::Decimal;
use tracing::debug;

use super::{HoldingPeriod, Jurisdiction, PortfolioTaxContext, TaxError, TaxImpact, TaxProfile};

/// Computes layered tax impact.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxEngine;

impl TaxEngine {
    /// Create an engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Tax on a realized gain (or the offset value of a realized loss).
    ///
    /// Tax-advantaged accounts short-circuit to an empty impact before the
    /// jurisdiction is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::UnsupportedJurisdiction`] for an unknown code in a
    /// taxable account.
    pub fn compute(
        &self,
        profile: &TaxProfile,
        context: &PortfolioTaxContext,
        gain_or_loss: Decimal,
    ) -> Result<TaxImpact, TaxError> {
        if !context.is_taxable() {
            debug!(jurisdiction = %profile.jurisdiction, "Tax-advantaged account, no tax");
            return Ok(TaxImpact::zero(
                profile.jurisdiction.trim().to_ascii_uppercase(),
                gain_or_loss,
            ));
        }

        let jurisdiction = Jurisdiction::resolve(&profile.jurisdiction)?;
        let rules = jurisdiction.rules();
        let layers = rules.layers(profile, context.holding_period, gain_or_loss);
        let impact = TaxImpact::from_layers(jurisdiction.code(), gain_or_loss, layers);

        debug!(
            jurisdiction = jurisdiction.code(),
            gain = %gain_or_loss,
            total = %impact.total,
            "Tax impact computed"
        );

        Ok(impact)
    }

    /// Holding period for `days_held` under the jurisdiction's threshold.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::UnsupportedJurisdiction`] for an unknown code.
    pub fn classify_holding(&self, jurisdiction: &str, days_held: u32) -> Result<HoldingPeriod, TaxError> {
        Ok(Jurisdiction::resolve(jurisdiction)?
            .rules()
            .classify_holding(days_held))
    }

    /// Canonical codes of every supported jurisdiction.
    #[must_use]
    pub fn supported_jurisdictions(&self) -> Vec<&'static str> {
        Jurisdiction::ALL.iter().map(Jurisdiction::code).collect()
    }
}
