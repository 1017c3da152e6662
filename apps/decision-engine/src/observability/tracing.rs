//! Log subscriber installation.
//!
//! # Example
//!
//! ```ignore
//! use decision_engine::config::LoggingConfig;
//! use decision_engine::observability::init_tracing;
//!
//! init_tracing(&LoggingConfig::default()).expect("Failed to initialize tracing");
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

/// Error type for tracing operations.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// Filter as given.
        filter: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber is already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.level`. `config.format` selects JSON or human-readable output.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter or a subscriber
/// has already been installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| TracingError::InvalidFilter {
            filter: config.level.clone(),
            message: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "pretty" {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    };

    result.map_err(|e| TracingError::SubscriberError(e.to_string()))?;

    tracing::info!(level = %config.level, format = %config.format, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_is_an_error() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        let Err(err) = init_tracing(&config) else {
            panic!("expected re-initialization error");
        };
        assert!(matches!(err, TracingError::SubscriberError(_)));
    }
}
