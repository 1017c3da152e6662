//! Tax Bounded Context
//!
//! Layered, jurisdiction-specific capital gains tax on a realized gain or
//! loss. Each supported jurisdiction is a closed variant of [`Jurisdiction`]
//! dispatching to its own [`TaxRules`] strategy; unknown codes are a hard
//! error.

pub mod engine;
pub mod errors;
pub mod impact;
pub mod jurisdiction;
pub mod profile;
pub mod rules;

pub use engine::TaxEngine;
pub use errors::TaxError;
pub use impact::{TaxImpact, TaxLayer};
pub use jurisdiction::{Jurisdiction, UsState};
pub use profile::{
    AccountType, FilingStatus, HoldingPeriod, IncomeTier, PortfolioTaxContext, TaxProfile,
};
pub use rules::TaxRules;
