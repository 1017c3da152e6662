//! Portfolio Bounded Context
//!
//! Weighted positions submitted by the investor, validated once at the
//! boundary so downstream simulation and tax code can assume
//! non-negative weights summing to one.

pub mod errors;
pub mod portfolio;
pub mod position;

pub use errors::PortfolioError;
pub use portfolio::{Portfolio, WEIGHT_TOLERANCE, WeightPolicy};
pub use position::Position;
