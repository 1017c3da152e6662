//! Moat analysis thresholds.

use serde::{Deserialize, Serialize};

use crate::domain::moats::{CorrelationRiskSettings, TaxHarvestSettings, TimeTravelSettings};

/// Moat configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MoatsConfig {
    /// Time-travel anchors.
    #[serde(default)]
    pub time_travel: TimeTravelSettings,
    /// Tax-loss harvesting thresholds.
    #[serde(default)]
    pub tax_harvest: TaxHarvestSettings,
    /// Correlation clustering thresholds.
    #[serde(default)]
    pub correlation: CorrelationRiskSettings,
}
