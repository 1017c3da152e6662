//! Decision aggregate.

use serde::{Deserialize, Serialize};

use super::{Action, MarketShock};

/// Classification of what a decision contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionType {
    /// Only macro shocks.
    MarketShock,
    /// Only trade actions.
    TradeAction,
    /// Shocks and actions.
    Combined,
    /// Nothing could be extracted.
    Unrecognized,
}

impl DecisionType {
    /// Stable lowercase name used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MarketShock => "market_shock",
            Self::TradeAction => "trade_action",
            Self::Combined => "combined",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A structured, immutable decision.
///
/// Deserialization goes through [`Decision::new`], so a stored
/// `decision_type` is recomputed and the confidence is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DecisionRecord")]
pub struct Decision {
    decision_type: DecisionType,
    confidence_score: f64,
    market_shocks: Vec<MarketShock>,
    actions: Vec<Action>,
}

/// Wire shape of a decision before its invariants are restored.
#[derive(Deserialize)]
struct DecisionRecord {
    #[serde(default)]
    confidence_score: f64,
    #[serde(default)]
    market_shocks: Vec<MarketShock>,
    #[serde(default)]
    actions: Vec<Action>,
}

impl From<DecisionRecord> for Decision {
    fn from(record: DecisionRecord) -> Self {
        Self::new(record.market_shocks, record.actions, record.confidence_score)
    }
}

impl Decision {
    /// Create a decision; the type is derived from its contents and the
    /// confidence is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(market_shocks: Vec<MarketShock>, actions: Vec<Action>, confidence: f64) -> Self {
        let decision_type = match (market_shocks.is_empty(), actions.is_empty()) {
            (false, false) => DecisionType::Combined,
            (false, true) => DecisionType::MarketShock,
            (true, false) => DecisionType::TradeAction,
            (true, true) => DecisionType::Unrecognized,
        };
        let confidence_score = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            decision_type,
            confidence_score,
            market_shocks,
            actions,
        }
    }

    /// An empty decision with the given (low) confidence.
    #[must_use]
    pub fn unrecognized(confidence: f64) -> Self {
        Self::new(Vec::new(), Vec::new(), confidence)
    }

    /// Decision classification.
    #[must_use]
    pub const fn decision_type(&self) -> DecisionType {
        self.decision_type
    }

    /// Parser confidence in `[0, 1]`.
    #[must_use]
    pub const fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    /// Macro shocks.
    #[must_use]
    pub fn market_shocks(&self) -> &[MarketShock] {
        &self.market_shocks
    }

    /// Trade actions.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// True when the decision carries neither shocks nor actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.market_shocks.is_empty() && self.actions.is_empty()
    }
}
