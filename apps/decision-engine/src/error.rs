//! Rich error handling for the decision engine.
//!
//! Fatal errors carry an [`ErrorCode`] that separates bad input from
//! upstream unavailability, so callers can decide between fixing the
//! request and retrying it.
//!
//! # HTTP Status Codes
//!
//! | Status | Class | Usage |
//! |--------|-------|-------|
//! | 400 | Bad input | Malformed request |
//! | 404 | Bad input | Stored portfolio not found |
//! | 422 | Bad input | Invalid portfolio, unsupported jurisdiction |
//! | 503 | Upstream | Insufficient price coverage, data or store unavailable |
//! | 504 | Upstream | Request budget elapsed |
//! | 500 | Internal | Unexpected failure, bad configuration |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::PortfolioStoreError;
use crate::config::ConfigError;
use crate::domain::market_data::MarketDataError;
use crate::domain::portfolio::PortfolioError;
use crate::domain::tax::TaxError;

/// Coarse error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    /// The request cannot succeed as written.
    BadInput,
    /// A dependency could not serve the request.
    Upstream,
    /// A defect or misconfiguration.
    Internal,
}

/// Error codes for the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Bad input
    /// Invalid request format or parameters.
    InvalidRequest,
    /// Portfolio failed validation.
    InvalidPortfolio,
    /// Stored portfolio id does not exist.
    PortfolioNotFound,
    /// Tax jurisdiction has no strategy.
    UnsupportedJurisdiction,

    // Upstream
    /// Too little portfolio weight has price history.
    InsufficientCoverage,
    /// The whole-request budget elapsed.
    RequestTimeout,
    /// Market data provider failed.
    MarketDataUnavailable,
    /// Portfolio store failed.
    StoreUnavailable,

    // Internal
    /// Invalid configuration.
    ConfigurationError,
    /// Internal error.
    InternalError,
}

impl ErrorCode {
    /// Error class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRequest
            | Self::InvalidPortfolio
            | Self::PortfolioNotFound
            | Self::UnsupportedJurisdiction => ErrorClass::BadInput,

            Self::InsufficientCoverage
            | Self::RequestTimeout
            | Self::MarketDataUnavailable
            | Self::StoreUnavailable => ErrorClass::Upstream,

            Self::ConfigurationError | Self::InternalError => ErrorClass::Internal,
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::PortfolioNotFound => 404,
            Self::InvalidPortfolio | Self::UnsupportedJurisdiction => 422,
            Self::InsufficientCoverage | Self::MarketDataUnavailable | Self::StoreUnavailable => {
                503
            }
            Self::RequestTimeout => 504,
            Self::ConfigurationError | Self::InternalError => 500,
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Upstream)
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidPortfolio => "INVALID_PORTFOLIO",
            Self::PortfolioNotFound => "PORTFOLIO_NOT_FOUND",
            Self::UnsupportedJurisdiction => "UNSUPPORTED_JURISDICTION",
            Self::InsufficientCoverage => "INSUFFICIENT_COVERAGE",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::MarketDataUnavailable => "MARKET_DATA_UNAVAILABLE",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context for the decision engine.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct EngineError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Additional context (key-value pairs).
    context: Vec<(String, String)>,
}

impl EngineError {
    /// Create a new engine error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// Convert to an HTTP-compatible error response.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            status: self.code.http_status(),
            retryable: self.code.is_retryable(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

/// HTTP-compatible error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Whether the client may retry.
    pub retryable: bool,
    /// Additional details.
    pub details: HashMap<String, String>,
}

/// Convenience constructors for common errors.
impl EngineError {
    /// Invalid request.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Price history covers too little of the portfolio.
    #[must_use]
    pub fn insufficient_coverage(coverage: f64, required: f64) -> Self {
        Self::new(
            ErrorCode::InsufficientCoverage,
            format!(
                "price history covers {:.1}% of portfolio weight, {:.1}% required",
                coverage * 100.0,
                required * 100.0
            ),
        )
        .with_context("coverage", format!("{coverage:.4}"))
        .with_context("required", format!("{required:.4}"))
    }

    /// Request budget elapsed.
    #[must_use]
    pub fn request_timeout(timeout_ms: u64) -> Self {
        Self::new(
            ErrorCode::RequestTimeout,
            format!("request exceeded {timeout_ms}ms budget"),
        )
        .with_context("timeout_ms", timeout_ms.to_string())
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<PortfolioError> for EngineError {
    fn from(err: PortfolioError) -> Self {
        Self::new(ErrorCode::InvalidPortfolio, err.to_string())
    }
}

impl From<TaxError> for EngineError {
    fn from(err: TaxError) -> Self {
        match &err {
            TaxError::UnsupportedJurisdiction { code } => {
                let code = code.clone();
                Self::new(ErrorCode::UnsupportedJurisdiction, err.to_string())
                    .with_context("jurisdiction", code)
            }
        }
    }
}

impl From<MarketDataError> for EngineError {
    fn from(err: MarketDataError) -> Self {
        let code = match err {
            MarketDataError::Timeout { .. } => ErrorCode::RequestTimeout,
            MarketDataError::InvalidInterval { .. } => ErrorCode::InvalidRequest,
            MarketDataError::SymbolNotFound { .. } | MarketDataError::DataUnavailable { .. } => {
                ErrorCode::MarketDataUnavailable
            }
        };
        Self::new(code, err.to_string())
    }
}

impl From<PortfolioStoreError> for EngineError {
    fn from(err: PortfolioStoreError) -> Self {
        match &err {
            PortfolioStoreError::NotFound { id } => {
                let id = id.clone();
                Self::new(ErrorCode::PortfolioNotFound, err.to_string()).with_context("portfolio_id", id)
            }
            PortfolioStoreError::Unavailable { .. } => {
                Self::new(ErrorCode::StoreUnavailable, err.to_string())
            }
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorCode::ConfigurationError, err.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("simulation task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(ErrorCode::InvalidPortfolio.class(), ErrorClass::BadInput);
        assert_eq!(ErrorCode::UnsupportedJurisdiction.class(), ErrorClass::BadInput);
        assert_eq!(ErrorCode::InsufficientCoverage.class(), ErrorClass::Upstream);
        assert_eq!(ErrorCode::RequestTimeout.class(), ErrorClass::Upstream);
        assert_eq!(ErrorCode::InternalError.class(), ErrorClass::Internal);
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::InvalidRequest.http_status(), 400);
        assert_eq!(ErrorCode::UnsupportedJurisdiction.http_status(), 422);
        assert_eq!(ErrorCode::InsufficientCoverage.http_status(), 503);
        assert_eq!(ErrorCode::RequestTimeout.http_status(), 504);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_retryable_only_upstream() {
        assert!(ErrorCode::InsufficientCoverage.is_retryable());
        assert!(ErrorCode::RequestTimeout.is_retryable());
        assert!(!ErrorCode::UnsupportedJurisdiction.is_retryable());
        assert!(!ErrorCode::InternalError.is_retryable());
    }

    #[test]
    fn test_unsupported_jurisdiction_conversion() {
        let error: EngineError = TaxError::UnsupportedJurisdiction {
            code: "FR".to_string(),
        }
        .into();

        assert_eq!(error.code(), ErrorCode::UnsupportedJurisdiction);
        let response = error.to_http_response();
        assert_eq!(response.status, 422);
        assert!(!response.retryable);
        assert_eq!(response.details.get("jurisdiction").map(String::as_str), Some("FR"));
    }

    #[test]
    fn test_insufficient_coverage_response() {
        let response = EngineError::insufficient_coverage(0.4, 0.6).to_http_response();
        assert_eq!(response.code, "INSUFFICIENT_COVERAGE");
        assert_eq!(response.status, 503);
        assert!(response.retryable);
        assert!(response.details.contains_key("coverage"));
    }

    #[test]
    fn test_error_display() {
        let error = EngineError::invalid_request("Missing text");
        assert_eq!(error.to_string(), "[INVALID_REQUEST] Missing text");
    }
}
