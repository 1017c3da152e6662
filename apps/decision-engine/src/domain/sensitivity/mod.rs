//! Shock Sensitivity Bounded Context
//!
//! Static lookup from `(shock type, target, ticker or sector)` to a
//! sensitivity coefficient. Unmapped combinations are neutral (0.0).

mod model;
mod sector;

pub use model::{LONG_YIELD_TARGET, SensitivityModel};
pub use sector::Sector;
