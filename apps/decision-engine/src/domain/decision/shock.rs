//! Market shock value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro shock family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShockType {
    /// Policy or market interest rates.
    InterestRate,
    /// Crude oil price.
    Oil,
    /// Real GDP growth.
    Gdp,
    /// Consumer price inflation.
    Inflation,
}

impl ShockType {
    /// Unit a magnitude of this shock is expressed in.
    #[must_use]
    pub const fn natural_unit(&self) -> ShockUnit {
        match self {
            Self::Oil => ShockUnit::Percent,
            Self::InterestRate | Self::Gdp | Self::Inflation => ShockUnit::PercentagePoints,
        }
    }

    /// Stable lowercase name used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InterestRate => "interest_rate",
            Self::Oil => "oil",
            Self::Gdp => "gdp",
            Self::Inflation => "inflation",
        }
    }
}

impl fmt::Display for ShockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a shock magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShockUnit {
    /// Relative change in value ("oil +20%").
    Percent,
    /// Absolute change in a rate ("rates +1%" = +1 point).
    PercentagePoints,
    /// Absolute change in a rate, in hundredths of a point.
    BasisPoints,
}

/// A hypothesized macro event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketShock {
    /// Shock family.
    pub shock_type: ShockType,
    /// Specific target within the family ("policy_rate", "10y_treasury", "brent").
    pub target: String,
    /// Signed magnitude in `unit`.
    pub magnitude: f64,
    /// Magnitude unit.
    pub unit: ShockUnit,
}

impl MarketShock {
    /// Magnitude in the shock type's natural unit (points or percent).
    #[must_use]
    pub fn normalized_magnitude(&self) -> f64 {
        match self.unit {
            ShockUnit::BasisPoints => self.magnitude / 100.0,
            ShockUnit::Percent | ShockUnit::PercentagePoints => self.magnitude,
        }
    }
}
