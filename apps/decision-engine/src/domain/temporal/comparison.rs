//! Scenario-minus-baseline comparison.

use serde::{Deserialize, Serialize};

use crate::domain::simulation::SimulationPaths;

/// Scenario minus baseline, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Difference in median terminal return.
    pub delta_return: f64,
    /// Difference in median max drawdown (positive = deeper drawdown).
    pub delta_drawdown: f64,
    /// Baseline median terminal return, percent.
    pub baseline_terminal_return: f64,
    /// Scenario median terminal return, percent.
    pub scenario_terminal_return: f64,
}

impl ComparisonResult {
    /// Compare two simulation runs.
    #[must_use]
    pub fn between(baseline: &SimulationPaths, scenario: &SimulationPaths) -> Self {
        Self {
            delta_return: scenario.terminal_return - baseline.terminal_return,
            delta_drawdown: scenario.max_drawdown - baseline.max_drawdown,
            baseline_terminal_return: baseline.terminal_return,
            scenario_terminal_return: scenario.terminal_return,
        }
    }
}
