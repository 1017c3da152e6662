//! Path Simulation Bounded Context
//!
//! Joint bootstrap Monte Carlo over historical daily returns. Every path
//! draws from its own deterministic sub-stream, so a baseline and a
//! scenario run with the same seed consume identical draws and pure noise
//! cancels in their difference.

pub mod history;
pub mod paths;
pub mod seed;
pub mod simulator;
pub mod stats;

pub use history::{ReturnHistory, ReturnHistorySet};
pub use paths::{PathPercentiles, SimulationPaths};
pub use seed::derive_seed;
pub use simulator::{PathSimulator, SimulationParams};
