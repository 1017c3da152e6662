//! Simulation output.

use serde::{Deserialize, Serialize};

use crate::domain::shared::Ticker;

/// Cross-path distribution of portfolio value on one horizon day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPercentiles {
    /// Trading day (1-based).
    pub day: u32,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl PathPercentiles {
    /// Degenerate distribution at a single value.
    #[must_use]
    pub const fn flat(day: u32, value: f64) -> Self {
        Self {
            day,
            p5: value,
            p25: value,
            p50: value,
            p75: value,
            p95: value,
        }
    }
}

/// Distribution of simulated portfolio values over a horizon.
///
/// Always complete: data problems are reported through
/// `path_generation_error` and `excluded_tickers`, never by failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPaths {
    /// Horizon length in trading days.
    pub horizon_days: u32,
    /// Number of simulated paths.
    pub n_paths: u32,
    /// Starting portfolio value.
    pub initial_value: f64,
    /// One entry per day `1..=horizon_days`.
    pub trajectory: Vec<PathPercentiles>,
    /// Trajectory entries on the configured checkpoint days.
    pub checkpoints: Vec<PathPercentiles>,
    /// Median terminal return, percent.
    pub terminal_return: f64,
    /// Mean terminal return, percent.
    pub expected_return: f64,
    /// Median per-path peak-to-trough decline, percent (positive).
    pub max_drawdown: f64,
    /// Annualized volatility of simulated daily portfolio returns.
    pub annualized_vol: f64,
    /// Tickers left out for lack of history.
    pub excluded_tickers: Vec<Ticker>,
    /// Non-fatal diagnostic.
    pub path_generation_error: Option<String>,
}

impl SimulationPaths {
    /// A flat trajectory at `initial_value`, used when nothing can be simulated.
    #[must_use]
    pub fn flat(
        horizon_days: u32,
        n_paths: u32,
        initial_value: f64,
        checkpoint_days: &[u32],
        excluded_tickers: Vec<Ticker>,
        error: String,
    ) -> Self {
        let trajectory: Vec<PathPercentiles> = (1..=horizon_days)
            .map(|day| PathPercentiles::flat(day, initial_value))
            .collect();
        let checkpoints = select_checkpoints(&trajectory, checkpoint_days);

        Self {
            horizon_days,
            n_paths,
            initial_value,
            trajectory,
            checkpoints,
            terminal_return: 0.0,
            expected_return: 0.0,
            max_drawdown: 0.0,
            annualized_vol: 0.0,
            excluded_tickers,
            path_generation_error: Some(error),
        }
    }

    /// Median value on the last day.
    #[must_use]
    pub fn terminal_median_value(&self) -> f64 {
        self.trajectory.last().map_or(self.initial_value, |p| p.p50)
    }

    /// Whether the run degraded (exclusions or a flat fallback).
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.path_generation_error.is_some()
    }
}

/// Trajectory entries whose day is listed in `days`.
#[must_use]
pub fn select_checkpoints(trajectory: &[PathPercentiles], days: &[u32]) -> Vec<PathPercentiles> {
    trajectory
        .iter()
        .filter(|p| days.contains(&p.day))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_paths_cover_horizon() {
        let paths = SimulationPaths::flat(
            30,
            100,
            1000.0,
            &[1, 5, 10, 21, 63],
            vec![Ticker::new("NEW")],
            "no history".to_string(),
        );

        assert_eq!(paths.trajectory.len(), 30);
        assert_eq!(
            paths.checkpoints.iter().map(|p| p.day).collect::<Vec<_>>(),
            vec![1, 5, 10, 21]
        );
        assert_eq!(paths.terminal_median_value(), 1000.0);
        assert!(paths.is_degraded());
    }
}
