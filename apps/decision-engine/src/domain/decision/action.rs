//! Trade action value objects.

use serde::{Deserialize, Serialize};

use crate::domain::shared::Ticker;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    /// Increase exposure.
    Buy,
    /// Decrease exposure.
    Sell,
}

/// When an action executes relative to the start of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum Timing {
    /// Day 0.
    #[default]
    Immediate,
    /// After the given number of trading days.
    AfterDays(u32),
}

impl Timing {
    /// Trading-day offset at which the action takes effect (0 = immediate).
    #[must_use]
    pub const fn execution_offset_days(&self) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::AfterDays(days) => *days,
        }
    }
}

/// A hypothetical trade expressed as a change in portfolio weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Buy or sell.
    pub direction: TradeDirection,
    /// Instrument traded.
    pub symbol: Ticker,
    /// Weight change in percentage points of portfolio value.
    pub size_percent: f64,
    /// Execution timing.
    pub timing: Timing,
}

impl Action {
    /// Trading-day offset at which the action takes effect.
    #[must_use]
    pub const fn execution_offset_days(&self) -> u32 {
        self.timing.execution_offset_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_offsets() {
        assert_eq!(Timing::Immediate.execution_offset_days(), 0);
        assert_eq!(Timing::AfterDays(10).execution_offset_days(), 10);
        assert_eq!(Timing::default(), Timing::Immediate);
    }

    #[test]
    fn timing_serializes_with_tag() {
        let json = serde_json::to_string(&Timing::AfterDays(5)).unwrap();
        assert_eq!(json, r#"{"kind":"after_days","days":5}"#);
    }
}
