//! Temporal decision engine.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ComparisonResult, VerdictScore, VerdictThresholds};
use crate::domain::decision::Decision;
use crate::domain::portfolio::Portfolio;
use crate::domain::simulation::{PathSimulator, ReturnHistorySet, SimulationParams, SimulationPaths};

/// Outcome of evaluating one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Scenario minus baseline.
    pub comparison: ComparisonResult,
    /// Verdict and score.
    pub verdict: VerdictScore,
    /// Baseline paths, when requested.
    pub baseline_paths: Option<SimulationPaths>,
    /// Scenario paths, when requested.
    pub scenario_paths: Option<SimulationPaths>,
}

/// Orchestrates baseline and scenario simulations.
#[derive(Debug, Clone, Default)]
pub struct TemporalDecisionEngine {
    simulator: PathSimulator,
    thresholds: VerdictThresholds,
}

impl TemporalDecisionEngine {
    /// Create an engine.
    #[must_use]
    pub const fn new(simulator: PathSimulator, thresholds: VerdictThresholds) -> Self {
        Self {
            simulator,
            thresholds,
        }
    }

    /// Verdict cut-offs in use.
    #[must_use]
    pub const fn thresholds(&self) -> &VerdictThresholds {
        &self.thresholds
    }

    /// Simulate baseline and scenario and compare them.
    #[must_use]
    pub fn evaluate(
        &self,
        portfolio: &Portfolio,
        decision: &Decision,
        histories: &ReturnHistorySet,
        params: &SimulationParams,
        return_paths: bool,
    ) -> Evaluation {
        let (baseline, scenario) = self.run_pair(portfolio, decision, histories, params);

        let comparison = ComparisonResult::between(&baseline, &scenario);
        let verdict = self.thresholds.classify(&comparison);

        info!(
            decision_type = decision.decision_type().as_str(),
            delta_return = comparison.delta_return,
            delta_drawdown = comparison.delta_drawdown,
            verdict = %verdict.verdict,
            "Decision evaluated"
        );

        let (baseline_paths, scenario_paths) = if return_paths {
            (Some(baseline), Some(scenario))
        } else {
            (None, None)
        };

        Evaluation {
            comparison,
            verdict,
            baseline_paths,
            scenario_paths,
        }
    }

    /// Baseline and scenario paths, simulated concurrently.
    #[must_use]
    pub fn run_pair(
        &self,
        portfolio: &Portfolio,
        decision: &Decision,
        histories: &ReturnHistorySet,
        params: &SimulationParams,
    ) -> (SimulationPaths, SimulationPaths) {
        rayon::join(
            || self.simulator.simulate(portfolio, None, histories, params),
            || {
                self.simulator
                    .simulate(portfolio, Some(decision), histories, params)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{Action, MarketShock, ShockType, ShockUnit, Timing, TradeDirection};
    use crate::domain::portfolio::{Position, WeightPolicy};
    use crate::domain::shared::Ticker;
    use crate::domain::simulation::ReturnHistory;
    use crate::domain::temporal::Verdict;
    use rust_decimal_macros::dec;

    fn histories() -> ReturnHistorySet {
        ["AAPL", "JPM", "XOM", "NVDA"]
            .iter()
            .enumerate()
            .map(|(i, ticker)| {
                let returns = (0..200)
                    .map(|t| 0.015 * (t as f64 * 0.37 + i as f64).sin() + 0.0004)
                    .collect();
                ReturnHistory::new(*ticker, returns)
            })
            .collect()
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![
                Position::new("AAPL", 0.4),
                Position::new("JPM", 0.3),
                Position::new("XOM", 0.3),
            ],
            dec!(50000),
            "USD",
            WeightPolicy::Reject,
        )
        .unwrap()
    }

    fn params() -> SimulationParams {
        SimulationParams::default().with_paths(250)
    }

    #[test]
    fn empty_decision_has_zero_delta() {
        let engine = TemporalDecisionEngine::default();
        let evaluation = engine.evaluate(
            &portfolio(),
            &Decision::unrecognized(0.0),
            &histories(),
            &params(),
            false,
        );

        assert_eq!(evaluation.comparison.delta_return, 0.0);
        assert_eq!(evaluation.comparison.delta_drawdown, 0.0);
        assert_eq!(evaluation.verdict.verdict, Verdict::Neutral);
        assert!(evaluation.baseline_paths.is_none());
    }

    #[test]
    fn rate_hike_is_negative() {
        let decision = Decision::new(
            vec![MarketShock {
                shock_type: ShockType::InterestRate,
                target: "policy_rate".to_string(),
                magnitude: 1.0,
                unit: ShockUnit::PercentagePoints,
            }],
            vec![],
            0.75,
        );
        let evaluation =
            TemporalDecisionEngine::default().evaluate(&portfolio(), &decision, &histories(), &params(), false);

        assert!(evaluation.comparison.delta_return < 0.0);
        assert!(evaluation.verdict.verdict < Verdict::Neutral);
    }

    #[test]
    fn paths_returned_on_request() {
        let decision = Decision::new(
            vec![],
            vec![Action {
                direction: TradeDirection::Buy,
                symbol: Ticker::new("NVDA"),
                size_percent: 10.0,
                timing: Timing::AfterDays(10),
            }],
            0.6,
        );
        let evaluation =
            TemporalDecisionEngine::default().evaluate(&portfolio(), &decision, &histories(), &params(), true);

        let (Some(baseline), Some(scenario)) = (&evaluation.baseline_paths, &evaluation.scenario_paths)
        else {
            panic!("paths should be returned");
        };
        assert_eq!(baseline.trajectory.len(), 30);
        assert_eq!(baseline.trajectory.len(), scenario.trajectory.len());
    }
}
