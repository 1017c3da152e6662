//! Time-travel replay: the same decision evaluated from earlier start dates.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MoatResult;
use crate::domain::decision::Decision;
use crate::domain::portfolio::Portfolio;
use crate::domain::simulation::{ReturnHistorySet, SimulationParams};
use crate::domain::temporal::{TemporalDecisionEngine, Verdict};

/// Anchor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeTravelSettings {
    /// Fewest valid anchors for the replay to apply.
    pub min_anchors: u32,
    /// Anchors attempted.
    pub max_anchors: u32,
    /// Trading days between anchors.
    pub anchor_step_days: u32,
    /// Paths per anchor evaluation.
    pub n_paths: u32,
}

impl Default for TimeTravelSettings {
    fn default() -> Self {
        Self {
            min_anchors: 3,
            max_anchors: 6,
            anchor_step_days: 21,
            n_paths: 200,
        }
    }
}

/// Evaluation anchored `offset_days` in the past.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorOutcome {
    /// Trading days back from today.
    pub offset_days: u32,
    /// Scenario minus baseline terminal return at this anchor.
    pub delta_return: f64,
    /// Scenario minus baseline drawdown at this anchor.
    pub delta_drawdown: f64,
    /// Verdict at this anchor.
    pub verdict: Verdict,
}

/// Distribution of outcomes across anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTravelReport {
    /// Per-anchor outcomes, most recent anchor first.
    pub anchors: Vec<AnchorOutcome>,
    /// Mean delta return.
    pub mean_delta_return: f64,
    /// Worst delta return.
    pub min_delta_return: f64,
    /// Best delta return.
    pub max_delta_return: f64,
    /// Share of anchors with a positive delta return.
    pub share_positive: f64,
}

/// Replay `decision` from alternate historical start offsets.
#[must_use]
pub fn replay(
    engine: &TemporalDecisionEngine,
    portfolio: &Portfolio,
    decision: &Decision,
    histories: &ReturnHistorySet,
    params: &SimulationParams,
    settings: &TimeTravelSettings,
) -> MoatResult<TimeTravelReport> {
    if decision.is_empty() {
        return MoatResult::not_applicable("decision has no shocks or actions to replay");
    }

    let anchor_params = params.clone().with_paths(settings.n_paths);
    let offsets: Vec<u32> = (1..=settings.max_anchors)
        .map(|k| k * settings.anchor_step_days)
        .filter(|&offset| offset > 0)
        .filter(|&offset| {
            let truncated = histories.truncated(offset as usize);
            portfolio
                .tickers()
                .chain(decision.actions().iter().map(|action| &action.symbol))
                .all(|ticker| truncated.is_usable(ticker, params.min_history_points))
        })
        .collect();

    if offsets.is_empty() || offsets.len() < settings.min_anchors as usize {
        return too_few_anchors(offsets.len(), settings);
    }

    let anchors: Vec<AnchorOutcome> = offsets
        .par_iter()
        .filter_map(|&offset_days| {
            let truncated = histories.truncated(offset_days as usize);
            let evaluation = engine.evaluate(portfolio, decision, &truncated, &anchor_params, true);

            // A degraded simulation drops tickers, so its delta is not comparable.
            let degraded = [&evaluation.baseline_paths, &evaluation.scenario_paths]
                .into_iter()
                .flatten()
                .find_map(|paths| paths.path_generation_error.as_deref());
            if let Some(reason) = degraded {
                debug!(offset_days, reason, "Skipping degraded anchor");
                return None;
            }

            Some(AnchorOutcome {
                offset_days,
                delta_return: evaluation.comparison.delta_return,
                delta_drawdown: evaluation.comparison.delta_drawdown,
                verdict: evaluation.verdict.verdict,
            })
        })
        .collect();

    if anchors.is_empty() || anchors.len() < settings.min_anchors as usize {
        return too_few_anchors(anchors.len(), settings);
    }

    let deltas: Vec<f64> = anchors.iter().map(|a| a.delta_return).collect();
    let count = deltas.len() as f64;
    let report = TimeTravelReport {
        mean_delta_return: deltas.iter().sum::<f64>() / count,
        min_delta_return: deltas.iter().copied().fold(f64::INFINITY, f64::min),
        max_delta_return: deltas.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        share_positive: deltas.iter().filter(|d| **d > 0.0).count() as f64 / count,
        anchors,
    };

    debug!(
        anchors = report.anchors.len(),
        mean_delta_return = report.mean_delta_return,
        "Time-travel replay complete"
    );

    MoatResult::applicable(
        format!(
            "replayed across {} historical anchors; delta return ranged {:.2} to {:.2} pp",
            report.anchors.len(),
            report.min_delta_return,
            report.max_delta_return
        ),
        report,
    )
}

fn too_few_anchors(valid: usize, settings: &TimeTravelSettings) -> MoatResult<TimeTravelReport> {
    MoatResult::not_applicable(format!(
        "only {valid} valid historical anchors, need {}",
        settings.min_anchors
    ))
}
