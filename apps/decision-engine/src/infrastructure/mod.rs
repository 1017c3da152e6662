//! Infrastructure Layer
//!
//! This module contains adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `marketdata/`: Price history adapters
//!
//! - **Wiring**: Dependency injection
//!   - `config/`: Container building use cases from configuration

pub mod config;
pub mod marketdata;
