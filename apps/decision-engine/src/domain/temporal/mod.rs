//! Temporal Decision Bounded Context
//!
//! Runs baseline and scenario simulations under shared randomness and turns
//! their difference into a comparison and an ordered verdict.

pub mod comparison;
pub mod engine;
pub mod verdict;

pub use comparison::ComparisonResult;
pub use engine::{Evaluation, TemporalDecisionEngine};
pub use verdict::{Verdict, VerdictScore, VerdictThresholds};
