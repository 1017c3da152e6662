//! Application Services
//!
//! Application services coordinate domain logic and infrastructure adapters.
//! They differ from use cases in that they are shared building blocks rather
//! than request entry points.

mod price_cache;
mod price_history;

pub use price_cache::CachedMarketData;
pub use price_history::PriceHistoryService;
