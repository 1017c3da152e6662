//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: `Portfolio` and `Decision`, validated once at construction
//! - **Value Objects**: tickers, shocks, actions, tax profiles, path percentiles
//! - **Domain Services**: path simulation, verdict classification, tax dispatch
//!
//! # Bounded Contexts
//!
//! - [`portfolio`]: Weighted positions and trade application
//! - [`decision`]: Shocks, actions and the decision aggregate
//! - [`intent`]: Free text to decision
//! - [`sensitivity`]: Sector classification and shock coefficients
//! - [`market_data`]: Price series and per-ticker fetch failures
//! - [`simulation`]: Bootstrap path simulation with shared randomness
//! - [`temporal`]: Baseline vs scenario comparison and verdicts
//! - [`tax`]: Jurisdiction strategies and layered tax impact
//! - [`moats`]: Time-travel, tax-loss harvesting and correlation risk

pub mod decision;
pub mod intent;
pub mod market_data;
pub mod moats;
pub mod portfolio;
pub mod sensitivity;
pub mod shared;
pub mod simulation;
pub mod tax;
pub mod temporal;
