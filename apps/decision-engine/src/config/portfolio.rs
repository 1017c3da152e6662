//! Portfolio validation policy.

use serde::{Deserialize, Serialize};

use crate::domain::portfolio::WeightPolicy;

/// Portfolio configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortfolioConfig {
    /// Handling of weights that miss the unit sum.
    #[serde(default)]
    pub weight_policy: WeightPolicy,
}
