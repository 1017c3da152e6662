// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Decision Engine - Rust Core Library
//!
//! Temporal decision intelligence for investment portfolios: "what happens
//! to my portfolio if I do X, or if Y happens?"
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic with no I/O
//!   - `intent`: Free text to structured decisions
//!   - `sensitivity`: Sector shock sensitivities
//!   - `simulation`: Shared-randomness bootstrap path simulation
//!   - `temporal`: Baseline vs scenario comparison and verdicts
//!   - `tax`: Layered, jurisdiction-specific capital gains tax
//!   - `moats`: Time-travel replay, tax-loss harvesting, correlation risk
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`MarketDataPort`, `PortfolioStorePort`)
//!   - `services`: Concurrent price history fetching and its TTL cache
//!   - `use_cases`: ParseDecision, EvaluateDecision, ComputeTaxImpact, RunMoats
//!   - `dto`: Request and response shapes
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `marketdata`: In-memory and synthetic price series
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Concerns
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Crate-level error codes.
pub mod error;

/// Tracing and metrics.
pub mod observability;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::decision::{
    Action, Decision, DecisionType, MarketShock, ShockType, ShockUnit, Timing, TradeDirection,
};
pub use domain::intent::IntentParser;
pub use domain::portfolio::{Portfolio, PortfolioError, Position, WeightPolicy};
pub use domain::shared::Ticker;
pub use domain::simulation::{PathSimulator, SimulationParams, SimulationPaths};
pub use domain::tax::{
    AccountType, FilingStatus, HoldingPeriod, IncomeTier, PortfolioTaxContext, TaxEngine,
    TaxError, TaxImpact, TaxProfile,
};
pub use domain::temporal::{
    ComparisonResult, Evaluation, TemporalDecisionEngine, Verdict, VerdictThresholds,
};

// Application re-exports
pub use application::dto::{
    EvaluateDecisionRequest, EvaluateDecisionResponse, MoatsResponse, RunMoatsRequest,
    StoredEvaluation, TaxImpactRequest,
};
pub use application::ports::{
    InMemoryPortfolioStore, MarketDataPort, PortfolioSet, PortfolioStoreError,
    PortfolioStorePort,
};
pub use application::use_cases::{
    ComputeTaxImpactUseCase, EvaluateDecisionUseCase, ParseDecisionUseCase, RunMoatsUseCase,
};

// Infrastructure re-exports
pub use infrastructure::config::Container;
pub use infrastructure::marketdata::InMemoryMarketData;

// Cross-cutting re-exports
pub use config::{Config, ConfigError, load_config};
pub use error::{EngineError, ErrorClass, ErrorCode};
