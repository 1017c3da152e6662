//! Configuration module for the decision engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for simulation, verdict, moat and market data settings.
//!
//! # Usage
//!
//! ```rust,ignore
//! use decision_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("paths per run: {}", config.simulation.n_paths);
//! ```

mod market_data;
mod moats;
mod observability;
mod portfolio;
mod simulation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use market_data::MarketDataConfig;
pub use moats::MoatsConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use portfolio::PortfolioConfig;
pub use simulation::{DEFAULT_SEED, SimulationConfig};

use crate::domain::temporal::VerdictThresholds;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Simulation defaults.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Verdict cut-offs and drawdown weight.
    #[serde(default)]
    pub verdict: VerdictThresholds,
    /// Moat thresholds.
    #[serde(default)]
    pub moats: MoatsConfig,
    /// Market data fetching.
    #[serde(default)]
    pub market_data: MarketDataConfig,
    /// Portfolio validation policy.
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |message: &str| Err(ConfigError::ValidationError(message.to_string()));

    let simulation = &config.simulation;
    if simulation.horizon_days == 0 {
        return invalid("simulation.horizon_days must be positive");
    }
    if simulation.n_paths == 0 {
        return invalid("simulation.n_paths must be positive");
    }
    if simulation.trading_periods_per_year == 0 {
        return invalid("simulation.trading_periods_per_year must be positive");
    }
    if simulation.min_history_points < 2 {
        return invalid("simulation.min_history_points must be at least 2");
    }
    if !simulation.risk_budget.is_finite() || simulation.risk_budget < 0.0 {
        return invalid("simulation.risk_budget must be a non-negative number");
    }

    if !config.verdict.is_ordered() {
        return invalid(
            "verdict thresholds must satisfy strongly_negative <= negative <= positive <= strongly_positive",
        );
    }
    if !config.verdict.drawdown_weight.is_finite() || config.verdict.drawdown_weight < 0.0 {
        return invalid("verdict.drawdown_weight must be non-negative");
    }

    let market_data = &config.market_data;
    if !(market_data.min_coverage > 0.0 && market_data.min_coverage <= 1.0) {
        return invalid("market_data.min_coverage must be in (0, 1]");
    }
    if market_data.fetch_timeout_ms == 0 || market_data.request_timeout_ms == 0 {
        return invalid("market_data timeouts must be positive");
    }
    if market_data.lookback_days == 0 {
        return invalid("market_data.lookback_days must be positive");
    }

    let time_travel = &config.moats.time_travel;
    if time_travel.min_anchors == 0 || time_travel.min_anchors > time_travel.max_anchors {
        return invalid("moats.time_travel requires 1 <= min_anchors <= max_anchors");
    }
    if time_travel.anchor_step_days == 0 || time_travel.n_paths == 0 {
        return invalid("moats.time_travel.anchor_step_days and n_paths must be positive");
    }

    let harvest = &config.moats.tax_harvest;
    if !harvest.min_loss_pct.is_finite() || harvest.min_loss_pct < 0.0 {
        return invalid("moats.tax_harvest.min_loss_pct must be non-negative");
    }
    if harvest.min_loss_amount.is_sign_negative() {
        return invalid("moats.tax_harvest.min_loss_amount must be non-negative");
    }

    let correlation = &config.moats.correlation;
    for (name, value) in [
        ("pair_threshold", correlation.pair_threshold),
        ("concentration_threshold", correlation.concentration_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "moats.correlation.{name} must be between 0.0 and 1.0"
            )));
        }
    }
    if correlation.min_overlap < 2 {
        return invalid("moats.correlation.min_overlap must be at least 2");
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::market_data::Interval;
    use crate::domain::portfolio::WeightPolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.simulation.horizon_days, 30);
        assert_eq!(config.simulation.n_paths, 1000);
        assert_eq!(config.simulation.seed, None);
        assert!((config.verdict.negative + 0.5).abs() < f64::EPSILON);
        assert_eq!(config.moats.time_travel.max_anchors, 6);
        assert_eq!(config.moats.tax_harvest.min_loss_amount, dec!(100));
        assert_eq!(config.market_data.interval, Interval::OneDay);
        assert_eq!(config.portfolio.weight_policy, WeightPolicy::Normalize);
        assert_eq!(config.observability.logging.format, "json");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config() {
        let config = match load_config_from_string("") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_config() {
        let yaml = r#"
simulation:
  n_paths: 250
  seed: 7
verdict:
  positive: 1.0
market_data:
  interval: "1wk"
portfolio:
  weight_policy: REJECT
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load partial config: {e}"),
        };
        assert_eq!(config.simulation.n_paths, 250);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.horizon_days, 30);
        assert!((config.verdict.positive - 1.0).abs() < f64::EPSILON);
        assert!((config.verdict.strongly_positive - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.market_data.interval, Interval::OneWeek);
        assert_eq!(config.portfolio.weight_policy, WeightPolicy::Reject);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${DECISION_ENGINE_TEST_NONEXISTENT_VAR:-debug}";
        assert_eq!(interpolate_env_vars(input), "level: debug");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${DECISION_ENGINE_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "level: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_uses_existing() {
        let result = interpolate_env_vars("path: ${PATH:-default}");
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_validation_unordered_verdict_thresholds() {
        let yaml = r"
verdict:
  negative: 1.0
  positive: 0.5
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for unordered thresholds");
        };
        assert!(err.to_string().contains("verdict thresholds"));
    }

    #[test]
    fn test_validation_zero_paths() {
        let yaml = r"
simulation:
  n_paths: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero paths");
        };
        assert!(err.to_string().contains("n_paths"));
    }

    #[test]
    fn test_validation_coverage_out_of_range() {
        let yaml = r"
market_data:
  min_coverage: 1.5
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for coverage");
        };
        assert!(err.to_string().contains("min_coverage"));
    }

    #[test]
    fn test_validation_correlation_threshold_out_of_range() {
        let yaml = r"
moats:
  correlation:
    pair_threshold: 1.2
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for correlation threshold");
        };
        assert!(err.to_string().contains("pair_threshold"));
    }

    #[test]
    fn test_validation_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for log format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulation:\n  horizon_days: 63").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.simulation.horizon_days, 63);
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/decision-engine.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
