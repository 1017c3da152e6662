//! Taxpayer profile and account context.

use serde::{Deserialize, Serialize};

/// Filing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single filer.
    #[default]
    Single,
    /// Married filing jointly.
    MarriedJoint,
    /// Married filing separately.
    MarriedSeparate,
    /// Head of household.
    HeadOfHousehold,
}

/// Ordinal income bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTier {
    /// Lowest bracket group.
    Low,
    /// Middle brackets.
    #[default]
    Middle,
    /// Upper brackets.
    High,
    /// Top bracket.
    Top,
}

impl IncomeTier {
    /// Position in `[Low, Middle, High, Top]`, for indexing rate tables.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Middle => 1,
            Self::High => 2,
            Self::Top => 3,
        }
    }
}

/// Who pays and at which rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Jurisdiction code ("US", "US-CA", "UK", "IN", "DE", ...).
    pub jurisdiction: String,
    /// Filing status.
    #[serde(default)]
    pub filing_status: FilingStatus,
    /// Income bucket.
    #[serde(default)]
    pub income_tier: IncomeTier,
}

impl TaxProfile {
    /// Create a profile.
    #[must_use]
    pub fn new(jurisdiction: impl Into<String>, filing_status: FilingStatus, income_tier: IncomeTier) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            filing_status,
            income_tier,
        }
    }
}

/// Account wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Ordinary brokerage account.
    #[default]
    Taxable,
    /// IRA, 401(k), ISA, PPF and similar.
    TaxAdvantaged,
}

/// Holding-period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HoldingPeriod {
    /// Held up to the jurisdiction threshold.
    #[default]
    ShortTerm,
    /// Held longer than the threshold.
    LongTerm,
}

/// Account context of the gain being taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortfolioTaxContext {
    /// Account type.
    pub account_type: AccountType,
    /// Holding period.
    pub holding_period: HoldingPeriod,
}

impl PortfolioTaxContext {
    /// Create a context.
    #[must_use]
    pub const fn new(account_type: AccountType, holding_period: HoldingPeriod) -> Self {
        Self {
            account_type,
            holding_period,
        }
    }

    /// Taxable account with the given holding period.
    #[must_use]
    pub const fn taxable(holding_period: HoldingPeriod) -> Self {
        Self::new(AccountType::Taxable, holding_period)
    }

    /// Whether gains in this account are taxed.
    #[must_use]
    pub const fn is_taxable(&self) -> bool {
        matches!(self.account_type, AccountType::Taxable)
    }
}
