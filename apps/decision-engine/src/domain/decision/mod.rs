//! Decision Bounded Context
//!
//! The structured form of an investor's free-text decision: hypothetical
//! macro shocks and (possibly delayed) trade actions. Decisions are created
//! by the intent parser and never mutated afterwards.

pub mod action;
pub mod decision;
pub mod shock;

pub use action::{Action, Timing, TradeDirection};
pub use decision::{Decision, DecisionType};
pub use shock::{MarketShock, ShockType, ShockUnit};
