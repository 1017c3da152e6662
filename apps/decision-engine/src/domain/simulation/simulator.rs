//! Joint bootstrap path simulator.

use std::collections::HashMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, span, warn};

use super::paths::select_checkpoints;
use super::stats::{max_drawdown, mean, median, percentile_sorted, sorted, std_dev};
use super::{PathPercentiles, ReturnHistorySet, SimulationPaths, derive_seed};
use crate::domain::decision::{Action, Decision};
use crate::domain::portfolio::Portfolio;
use crate::domain::sensitivity::SensitivityModel;
use crate::domain::shared::Ticker;

/// Inputs that shape one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Horizon in trading days.
    pub horizon_days: u32,
    /// Number of paths.
    pub n_paths: u32,
    /// Request-level seed; path `p` uses `derive_seed(seed, p)`.
    pub seed: u64,
    /// Scale applied to shock adjustments.
    pub risk_budget: f64,
    /// Periods per year for volatility annualization.
    pub trading_periods_per_year: u32,
    /// Minimum return observations for a ticker to be simulated.
    pub min_history_points: usize,
    /// Days reported in `SimulationPaths::checkpoints`.
    pub checkpoints: Vec<u32>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            n_paths: 1000,
            seed: 42,
            risk_budget: 1.0,
            trading_periods_per_year: 252,
            min_history_points: 20,
            checkpoints: vec![1, 5, 10, 21, 63, 126, 252],
        }
    }
}

impl SimulationParams {
    /// Set the horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Set the path count.
    #[must_use]
    pub const fn with_paths(mut self, n_paths: u32) -> Self {
        self.n_paths = n_paths;
        self
    }

    /// Set the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Weights active from `start_day` on, as `(asset index, weight)` pairs.
struct Phase {
    start_day: u32,
    weights: Vec<(usize, f64)>,
}

/// Per-path simulated values (normalized to 1.0 at day 0) and daily returns.
struct PathOutcome {
    values: Vec<f64>,
    returns: Vec<f64>,
}

/// Monte Carlo path simulator.
#[derive(Debug, Clone, Default)]
pub struct PathSimulator {
    model: SensitivityModel,
}

impl PathSimulator {
    /// Create a simulator over a sensitivity model.
    #[must_use]
    pub const fn new(model: SensitivityModel) -> Self {
        Self { model }
    }

    /// Sensitivity model in use.
    #[must_use]
    pub const fn model(&self) -> &SensitivityModel {
        &self.model
    }

    /// Simulate `portfolio` under an optional decision.
    ///
    /// Deterministic in its inputs. Each path draws one historical date
    /// index per day, shared across assets, from the most recent window
    /// common to all usable histories in `histories`; runs over the same
    /// history set and seed therefore see identical draws. Actions switch
    /// the weight vector from their execution offset on; shocks adjust each
    /// asset's day-0 return.
    #[must_use]
    pub fn simulate(
        &self,
        portfolio: &Portfolio,
        decision: Option<&Decision>,
        histories: &ReturnHistorySet,
        params: &SimulationParams,
    ) -> SimulationPaths {
        let span = span!(
            Level::DEBUG,
            "simulate",
            n_paths = params.n_paths,
            horizon_days = params.horizon_days,
            scenario = decision.is_some()
        );
        let _enter = span.enter();
        let start = Instant::now();

        let initial_value = portfolio.total_value_f64();
        let schedule = weight_schedule(portfolio, decision);

        let mut universe: Vec<&Ticker> = Vec::new();
        for (_, phase_portfolio) in &schedule {
            for ticker in phase_portfolio.tickers() {
                if !universe.contains(&ticker) {
                    universe.push(ticker);
                }
            }
        }

        let mut excluded = Vec::new();
        let mut diagnostics = Vec::new();
        for ticker in &universe {
            if !histories.is_usable(ticker, params.min_history_points) {
                let points = histories.get(ticker).map_or(0, |h| h.len());
                diagnostics.push(format!(
                    "insufficient history for {ticker}: {points} return observations, need {}",
                    params.min_history_points
                ));
                excluded.push((*ticker).clone());
            }
        }

        let window = histories.aligned_window(params.min_history_points);
        if excluded.len() == universe.len() || window == 0 {
            diagnostics.push("no ticker has usable history; returning a flat trajectory".to_string());
            warn!(excluded = ?excluded, "Path generation degraded to flat trajectory");
            return SimulationPaths::flat(
                params.horizon_days,
                params.n_paths,
                initial_value,
                &params.checkpoints,
                excluded,
                diagnostics.join("; "),
            );
        }
        if params.horizon_days == 0 || params.n_paths == 0 {
            return SimulationPaths::flat(
                params.horizon_days,
                params.n_paths,
                initial_value,
                &params.checkpoints,
                excluded,
                "nothing to simulate: zero horizon or zero paths".to_string(),
            );
        }

        let mut assets: Vec<&[f64]> = Vec::new();
        let mut index: HashMap<&Ticker, usize> = HashMap::new();
        for &ticker in &universe {
            if let Some(history) = histories
                .get(ticker)
                .filter(|h| h.len() >= params.min_history_points && !h.is_empty())
            {
                index.insert(ticker, assets.len());
                assets.push(history.recent(window));
            }
        }

        let phases: Vec<Phase> = schedule
            .iter()
            .map(|(start_day, phase_portfolio)| Phase {
                start_day: *start_day,
                weights: effective_weights(phase_portfolio, &index),
            })
            .collect();
        let phase_for_day: Vec<usize> = (0..params.horizon_days)
            .map(|day| {
                phases
                    .iter()
                    .rposition(|phase| phase.start_day <= day)
                    .unwrap_or(0)
            })
            .collect();

        let adjustments: Option<Vec<f64>> = decision
            .map(Decision::market_shocks)
            .filter(|shocks| !shocks.is_empty())
            .map(|shocks| {
                universe
                    .iter()
                    .filter(|ticker| index.contains_key(*ticker))
                    .map(|ticker| {
                        self.model
                            .return_adjustment(shocks, ticker.as_str(), params.risk_budget)
                    })
                    .collect()
            });

        let outcomes: Vec<PathOutcome> = (0..params.n_paths)
            .into_par_iter()
            .map(|path| {
                simulate_path(
                    derive_seed(params.seed, u64::from(path)),
                    &assets,
                    window,
                    &phases,
                    &phase_for_day,
                    adjustments.as_deref(),
                )
            })
            .collect();

        let paths = summarize(&outcomes, initial_value, params, excluded, diagnostics);

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            window,
            terminal_return = paths.terminal_return,
            max_drawdown = paths.max_drawdown,
            "Simulation complete"
        );

        paths
    }
}

/// Portfolio in effect from each offset on: the starting portfolio, then
/// the cumulative result of applying actions in offset order.
fn weight_schedule(portfolio: &Portfolio, decision: Option<&Decision>) -> Vec<(u32, Portfolio)> {
    let mut schedule = vec![(0, portfolio.clone())];

    if let Some(decision) = decision {
        let mut actions: Vec<&Action> = decision.actions().iter().collect();
        actions.sort_by_key(|action| action.execution_offset_days());

        let mut current = portfolio.clone();
        for action in actions {
            current = current.apply_action(action);
            schedule.push((action.execution_offset_days(), current.clone()));
        }
    }

    schedule
}

/// Weights over simulated assets; excluded tickers' weight is spread pro rata.
fn effective_weights(portfolio: &Portfolio, index: &HashMap<&Ticker, usize>) -> Vec<(usize, f64)> {
    let mut weights: Vec<(usize, f64)> = portfolio
        .positions()
        .iter()
        .filter_map(|p| index.get(&p.ticker).map(|&asset| (asset, p.weight)))
        .collect();

    if weights.len() < portfolio.positions().len() {
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if sum > 0.0 {
            for (_, weight) in &mut weights {
                *weight /= sum;
            }
        }
    }

    weights
}

fn simulate_path(
    seed: u64,
    assets: &[&[f64]],
    window: usize,
    phases: &[Phase],
    phase_for_day: &[usize],
    adjustments: Option<&[f64]>,
) -> PathOutcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut value = 1.0_f64;
    let mut values = Vec::with_capacity(phase_for_day.len());
    let mut returns = Vec::with_capacity(phase_for_day.len());

    for (day, &phase) in phase_for_day.iter().enumerate() {
        let draw = rng.random_range(0..window);

        let mut portfolio_return = 0.0;
        for &(asset, weight) in &phases[phase].weights {
            let mut asset_return = assets[asset][draw];
            if day == 0
                && let Some(adjustments) = adjustments
            {
                asset_return += adjustments[asset];
            }
            portfolio_return += weight * asset_return;
        }

        let portfolio_return = portfolio_return.max(-1.0);
        value *= 1.0 + portfolio_return;
        values.push(value);
        returns.push(portfolio_return);
    }

    PathOutcome { values, returns }
}

fn summarize(
    outcomes: &[PathOutcome],
    initial_value: f64,
    params: &SimulationParams,
    excluded: Vec<Ticker>,
    diagnostics: Vec<String>,
) -> SimulationPaths {
    let trajectory: Vec<PathPercentiles> = (0..params.horizon_days as usize)
        .map(|day| {
            let column = sorted(
                &outcomes
                    .iter()
                    .map(|o| o.values[day] * initial_value)
                    .collect::<Vec<_>>(),
            );
            PathPercentiles {
                day: day as u32 + 1,
                p5: percentile_sorted(&column, 0.05),
                p25: percentile_sorted(&column, 0.25),
                p50: percentile_sorted(&column, 0.50),
                p75: percentile_sorted(&column, 0.75),
                p95: percentile_sorted(&column, 0.95),
            }
        })
        .collect();

    let terminal: Vec<f64> = outcomes
        .iter()
        .map(|o| o.values.last().copied().unwrap_or(1.0))
        .collect();
    let drawdowns: Vec<f64> = outcomes
        .iter()
        .map(|o| max_drawdown(1.0, &o.values))
        .collect();
    let daily: Vec<f64> = outcomes.iter().flat_map(|o| o.returns.iter().copied()).collect();

    let annualized_vol = std_dev(&daily).unwrap_or(0.0)
        * f64::from(params.trading_periods_per_year).sqrt();

    SimulationPaths {
        horizon_days: params.horizon_days,
        n_paths: params.n_paths,
        initial_value,
        checkpoints: select_checkpoints(&trajectory, &params.checkpoints),
        trajectory,
        terminal_return: (median(&terminal) - 1.0) * 100.0,
        expected_return: (mean(&terminal).unwrap_or(1.0) - 1.0) * 100.0,
        max_drawdown: median(&drawdowns) * 100.0,
        annualized_vol,
        excluded_tickers: excluded,
        path_generation_error: (!diagnostics.is_empty()).then(|| diagnostics.join("; ")),
    }
}
