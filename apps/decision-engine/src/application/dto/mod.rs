//! Data Transfer Objects
//!
//! Request and response shapes for the use cases, independent of transport.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::decision::{Decision, DecisionType};
use crate::domain::moats::{CorrelationReport, MoatResult, TaxHarvestReport, TimeTravelReport};
use crate::domain::portfolio::Portfolio;
use crate::domain::tax::{PortfolioTaxContext, TaxProfile};
use crate::domain::temporal::Evaluation;

/// Evaluate a decision against a portfolio.
#[derive(Debug, Clone)]
pub struct EvaluateDecisionRequest {
    /// Portfolio to simulate.
    pub portfolio: Portfolio,
    /// Decision to evaluate.
    pub decision: Decision,
    /// Horizon override in trading days.
    pub horizon_days: Option<u32>,
    /// Path count override.
    pub n_paths: Option<u32>,
    /// Request-level seed.
    pub seed: Option<u64>,
    /// Include both path sets in the response.
    pub return_paths: bool,
}

impl EvaluateDecisionRequest {
    /// Request with configured defaults and no paths returned.
    #[must_use]
    pub const fn new(portfolio: Portfolio, decision: Decision) -> Self {
        Self {
            portfolio,
            decision,
            horizon_days: None,
            n_paths: None,
            seed: None,
            return_paths: false,
        }
    }

    /// Set the horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = Some(horizon_days);
        self
    }

    /// Set the path count.
    #[must_use]
    pub const fn with_paths(mut self, n_paths: u32) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Set the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Return baseline and scenario paths.
    #[must_use]
    pub const fn returning_paths(mut self) -> Self {
        self.return_paths = true;
        self
    }
}

/// Evaluation outcome plus data-quality notes.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateDecisionResponse {
    /// Unique id for correlating logs with this response.
    pub request_id: String,
    /// Type of the evaluated decision.
    pub decision_type: DecisionType,
    /// Comparison, verdict and optional paths.
    pub evaluation: Evaluation,
    /// Fraction of portfolio weight with price history.
    pub coverage: f64,
    /// Tickers whose history could not be fetched, with the reason.
    pub failed_tickers: BTreeMap<String, String>,
}

/// Compute tax on a single realized gain or loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxImpactRequest {
    /// Taxpayer profile.
    pub profile: TaxProfile,
    /// Account and holding period.
    pub context: PortfolioTaxContext,
    /// Realized gain (positive) or loss (negative).
    pub gain_or_loss: Decimal,
}

/// Run every moat for a portfolio and decision.
#[derive(Debug, Clone)]
pub struct RunMoatsRequest {
    /// Portfolio under analysis.
    pub portfolio: Portfolio,
    /// Decision under analysis.
    pub decision: Decision,
    /// Taxpayer profile for harvesting.
    pub tax_profile: TaxProfile,
    /// Account context for harvesting.
    pub tax_context: PortfolioTaxContext,
    /// Request-level seed for time-travel replays.
    pub seed: Option<u64>,
    /// Horizon override for time-travel replays.
    pub horizon_days: Option<u32>,
}

/// All moat results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoatsResponse {
    /// Decision replayed from earlier start dates.
    pub time_travel: MoatResult<TimeTravelReport>,
    /// Losses worth realizing.
    pub tax_harvest: MoatResult<TaxHarvestReport>,
    /// Correlated concentration.
    pub correlation_risk: MoatResult<CorrelationReport>,
}

/// Evaluation of free text against a stored portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvaluation {
    /// Id of the stored portfolio.
    pub portfolio_id: String,
    /// Decision parsed from the text.
    pub decision: Decision,
    /// Simulation outcome.
    pub response: EvaluateDecisionResponse,
}
