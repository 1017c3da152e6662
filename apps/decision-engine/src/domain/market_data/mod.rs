//! Market Data Bounded Context
//!
//! Price series as delivered by a market data provider, the partial
//! per-ticker `PriceTable` assembled from them, and their errors.

pub mod errors;
pub mod interval;
pub mod price;

pub use errors::MarketDataError;
pub use interval::Interval;
pub use price::{PricePoint, PriceSeries, PriceTable};
