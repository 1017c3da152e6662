//! Market Data Adapters
//!
//! Implementations of `MarketDataPort`. Live provider access sits outside
//! the engine; the in-memory adapter serves fixed or synthetic series.

mod in_memory;

pub use in_memory::InMemoryMarketData;
