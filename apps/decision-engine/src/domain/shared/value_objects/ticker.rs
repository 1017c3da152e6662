//! Ticker value object for listed instruments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Maximum accepted ticker length, suffix included.
const MAX_TICKER_LEN: usize = 15;

/// A listed instrument ticker.
///
/// Examples:
/// - US equity: "AAPL", "BRK-B"
/// - Regional listing: "RELIANCE.NS", "VOD.L", "7203.T"
/// - Index: "^GSPC"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Create a new Ticker.
    ///
    /// The ticker is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Regional exchange suffix, if any (`"NS"` for `"RELIANCE.NS"`).
    #[must_use]
    pub fn exchange_suffix(&self) -> Option<&str> {
        self.0
            .rsplit_once('.')
            .map(|(_, suffix)| suffix)
            .filter(|suffix| !suffix.is_empty())
    }

    /// Ticker without its regional suffix (`"VOD"` for `"VOD.L"`).
    #[must_use]
    pub fn base_symbol(&self) -> &str {
        self.0.rsplit_once('.').map_or(&self.0, |(base, _)| base)
    }

    /// Validate the ticker.
    ///
    /// # Errors
    ///
    /// Returns error if the ticker is empty, too long or contains
    /// characters other than alphanumerics, `.`, `-` and a leading `^`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: "Ticker cannot be empty".to_string(),
            });
        }

        if self.0.len() > MAX_TICKER_LEN {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: "Ticker exceeds maximum length".to_string(),
            });
        }

        let body = self.0.strip_prefix('^').unwrap_or(&self.0);
        if body.is_empty()
            || !body
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: format!("Ticker '{}' contains invalid characters", self.0),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Ticker {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Ticker {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_new_normalizes_case_and_whitespace() {
        let t = Ticker::new("  aapl ");
        assert_eq!(t.as_str(), "AAPL");
    }

    #[test]
    fn ticker_regional_suffix() {
        let t = Ticker::new("reliance.ns");
        assert_eq!(t.exchange_suffix(), Some("NS"));
        assert_eq!(t.base_symbol(), "RELIANCE");

        let plain = Ticker::new("NVDA");
        assert_eq!(plain.exchange_suffix(), None);
        assert_eq!(plain.base_symbol(), "NVDA");
    }

    #[test]
    fn ticker_validate_accepts_listing_formats() {
        for raw in ["AAPL", "BRK-B", "VOD.L", "7203.T", "^GSPC"] {
            assert!(Ticker::new(raw).validate().is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn ticker_validate_rejects_bad_input() {
        assert!(Ticker::new("").validate().is_err());
        assert!(Ticker::new("^").validate().is_err());
        assert!(Ticker::new("AA PL").validate().is_err());
        assert!(Ticker::new("AAPL!").validate().is_err());
        assert!(Ticker::new("A".repeat(20)).validate().is_err());
    }

    #[test]
    fn ticker_hash_ignores_case() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Ticker::new("AAPL"));
        set.insert(Ticker::new("MSFT"));
        set.insert(Ticker::new("aapl"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ticker_serde_is_transparent() {
        let t = Ticker::new("vod.l");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"VOD.L\"");

        let parsed: Ticker = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);
    }
}
