//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod compute_tax_impact;
mod evaluate_decision;
mod market_inputs;
mod parse_decision;
mod run_moats;

pub use compute_tax_impact::ComputeTaxImpactUseCase;
pub use evaluate_decision::EvaluateDecisionUseCase;
pub use parse_decision::ParseDecisionUseCase;
pub use run_moats::RunMoatsUseCase;
