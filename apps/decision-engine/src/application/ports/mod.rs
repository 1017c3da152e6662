//! Application Ports (Driver and Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! - **Driven Ports** (Secondary/Outbound): How our application uses external systems

mod market_data_port;
mod portfolio_store_port;

pub use market_data_port::MarketDataPort;
pub use portfolio_store_port::{
    InMemoryPortfolioStore, PortfolioSet, PortfolioStoreError, PortfolioStorePort,
};
