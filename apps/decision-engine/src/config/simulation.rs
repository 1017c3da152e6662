//! Simulation defaults.

use serde::{Deserialize, Serialize};

use crate::domain::simulation::SimulationParams;

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Horizon in trading days.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Monte Carlo paths per run.
    #[serde(default = "default_n_paths")]
    pub n_paths: u32,
    /// Periods per year for volatility annualization.
    #[serde(default = "default_periods_per_year")]
    pub trading_periods_per_year: u32,
    /// Minimum return observations for a ticker to be simulated.
    #[serde(default = "default_min_history_points")]
    pub min_history_points: usize,
    /// Fixed seed; requests without one fall back to this, then to 42.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Days reported as checkpoints.
    #[serde(default = "default_checkpoints")]
    pub checkpoints: Vec<u32>,
    /// Scale applied to shock adjustments.
    #[serde(default = "default_risk_budget")]
    pub risk_budget: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            n_paths: default_n_paths(),
            trading_periods_per_year: default_periods_per_year(),
            min_history_points: default_min_history_points(),
            seed: None,
            checkpoints: default_checkpoints(),
            risk_budget: default_risk_budget(),
        }
    }
}

impl SimulationConfig {
    /// Simulation parameters, with `seed` taking precedence over the configured one.
    #[must_use]
    pub fn params(&self, seed: Option<u64>) -> SimulationParams {
        SimulationParams {
            horizon_days: self.horizon_days,
            n_paths: self.n_paths,
            seed: seed.or(self.seed).unwrap_or(DEFAULT_SEED),
            risk_budget: self.risk_budget,
            trading_periods_per_year: self.trading_periods_per_year,
            min_history_points: self.min_history_points,
            checkpoints: self.checkpoints.clone(),
        }
    }
}

/// Seed used when neither the request nor the configuration supplies one.
pub const DEFAULT_SEED: u64 = 42;

const fn default_horizon_days() -> u32 {
    30
}

const fn default_n_paths() -> u32 {
    1000
}

const fn default_periods_per_year() -> u32 {
    252
}

const fn default_min_history_points() -> usize {
    20
}

fn default_checkpoints() -> Vec<u32> {
    vec![1, 5, 10, 21, 63, 126, 252]
}

const fn default_risk_budget() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_seed_overrides_configured_seed() {
        let config = SimulationConfig {
            seed: Some(7),
            ..Default::default()
        };
        assert_eq!(config.params(Some(99)).seed, 99);
        assert_eq!(config.params(None).seed, 7);
        assert_eq!(SimulationConfig::default().params(None).seed, DEFAULT_SEED);
    }

    #[test]
    fn defaults_match_simulation_params() {
        assert_eq!(SimulationConfig::default().params(None), SimulationParams::default());
    }
}
