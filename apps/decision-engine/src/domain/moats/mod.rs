//! Moat Analyses
//!
//! Supplementary findings layered on top of simulation and tax results.
//! A moat never fails: when it does not apply, it says why.

pub mod correlation_risk;
pub mod tax_harvest;
pub mod time_travel;

pub use correlation_risk::{CorrelationCluster, CorrelationReport, CorrelationRiskSettings};
pub use tax_harvest::{HarvestCandidate, TaxHarvestReport, TaxHarvestSettings};
pub use time_travel::{AnchorOutcome, TimeTravelReport, TimeTravelSettings};

use serde::{Deserialize, Serialize};

/// Outcome of one moat analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoatResult<T> {
    /// Whether the finding applies to this portfolio and decision.
    pub applicable: bool,
    /// Human-readable explanation.
    pub reason: String,
    /// Moat-specific detail, when computed.
    pub payload: Option<T>,
}

impl<T> MoatResult<T> {
    /// An applicable finding.
    #[must_use]
    pub fn applicable(reason: impl Into<String>, payload: T) -> Self {
        Self {
            applicable: true,
            reason: reason.into(),
            payload: Some(payload),
        }
    }

    /// Not applicable, with no payload.
    #[must_use]
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            applicable: false,
            reason: reason.into(),
            payload: None,
        }
    }

    /// Not applicable, but with the computed detail attached.
    #[must_use]
    pub fn not_applicable_with(reason: impl Into<String>, payload: T) -> Self {
        Self {
            applicable: false,
            reason: reason.into(),
            payload: Some(payload),
        }
    }
}
