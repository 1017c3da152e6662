//! Compute Tax Impact Use Case

use rust_decimal::Decimal;
use tracing::warn;

use crate::application::dto::TaxImpactRequest;
use crate::domain::tax::{
    AccountType, HoldingPeriod, PortfolioTaxContext, TaxEngine, TaxImpact, TaxProfile,
};
use crate::error::EngineError;
use crate::observability::record_tax_computation;

/// Use case for layered tax on a realized gain or loss.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComputeTaxImpactUseCase {
    engine: TaxEngine,
}

impl ComputeTaxImpactUseCase {
    /// Create a new ComputeTaxImpactUseCase.
    #[must_use]
    pub const fn new(engine: TaxEngine) -> Self {
        Self { engine }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedJurisdiction` error for an unknown code in a
    /// taxable account.
    pub fn execute(&self, request: &TaxImpactRequest) -> Result<TaxImpact, EngineError> {
        let result = self
            .engine
            .compute(&request.profile, &request.context, request.gain_or_loss);

        let status = match (&result, request.context.is_taxable()) {
            (Err(_), _) => "unsupported",
            (Ok(_), false) => "short_circuit",
            (Ok(_), true) => "ok",
        };
        record_tax_computation(&request.profile.jurisdiction, status);

        result.map_err(|error| {
            warn!(jurisdiction = %request.profile.jurisdiction, error = %error, "Tax computation rejected");
            EngineError::from(error)
        })
    }

    /// Tax on selling a position held for `days_held`, classifying the
    /// holding period under the jurisdiction's own threshold.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedJurisdiction` error for an unknown code in a
    /// taxable account.
    pub fn execute_for_holding(
        &self,
        profile: &TaxProfile,
        account_type: AccountType,
        days_held: u32,
        gain_or_loss: Decimal,
    ) -> Result<TaxImpact, EngineError> {
        let holding_period = if account_type == AccountType::TaxAdvantaged {
            HoldingPeriod::default()
        } else {
            self.engine
                .classify_holding(&profile.jurisdiction, days_held)
                .map_err(EngineError::from)?
        };

        self.execute(&TaxImpactRequest {
            profile: profile.clone(),
            context: PortfolioTaxContext::new(account_type, holding_period),
            gain_or_loss,
        })
    }
}
