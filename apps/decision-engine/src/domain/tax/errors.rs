//! Tax errors.

/// Tax computation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxError {
    /// No rule set exists for the jurisdiction code.
    #[error("Unsupported jurisdiction: {code}")]
    UnsupportedJurisdiction {
        /// Code as supplied.
        code: String,
    },
}
