//! Verdict classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ComparisonResult;

/// Ordered qualitative outcome of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Score at or below the strongly-negative cut-off.
    StronglyNegative,
    /// Score below the negative cut-off.
    Negative,
    /// Score within the neutral band.
    Neutral,
    /// Score above the positive cut-off.
    Positive,
    /// Score at or above the strongly-positive cut-off.
    StronglyPositive,
}

impl Verdict {
    /// Stable lowercase name used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StronglyNegative => "strongly_negative",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::StronglyPositive => "strongly_positive",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict with the continuous score it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictScore {
    /// Category.
    pub verdict: Verdict,
    /// `delta_return - drawdown_weight * delta_drawdown`, percentage points.
    pub score: f64,
}

/// Cut-offs on the verdict score, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    /// At or below: strongly negative.
    pub strongly_negative: f64,
    /// Below: negative.
    pub negative: f64,
    /// Above: positive.
    pub positive: f64,
    /// At or above: strongly positive.
    pub strongly_positive: f64,
    /// Penalty per point of additional drawdown.
    pub drawdown_weight: f64,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            strongly_negative: -5.0,
            negative: -0.5,
            positive: 0.5,
            strongly_positive: 5.0,
            drawdown_weight: 0.5,
        }
    }
}

impl VerdictThresholds {
    /// Whether the cut-offs are strictly increasing around zero.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.strongly_negative < self.negative
            && self.negative <= 0.0
            && 0.0 <= self.positive
            && self.positive < self.strongly_positive
            && self.drawdown_weight >= 0.0
    }

    /// Score a comparison.
    #[must_use]
    pub fn classify(&self, comparison: &ComparisonResult) -> VerdictScore {
        let score = comparison.delta_return - self.drawdown_weight * comparison.delta_drawdown;

        let verdict = if score <= self.strongly_negative {
            Verdict::StronglyNegative
        } else if score < self.negative {
            Verdict::Negative
        } else if score <= self.positive {
            Verdict::Neutral
        } else if score < self.strongly_positive {
            Verdict::Positive
        } else {
            Verdict::StronglyPositive
        };

        VerdictScore { verdict, score }
    }
}
