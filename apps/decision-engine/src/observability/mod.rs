//! Observability module for metrics, tracing, and logging.
//!
//! Structured logging through `tracing` and counters/histograms through the
//! `metrics` facade. No exporter is installed here; the embedding process
//! chooses one.

mod metrics;
mod tracing;

pub use metrics::{
    record_cache_lookup, record_evaluation, record_moat, record_parse, record_price_fetch,
    record_simulation, record_tax_computation,
};
pub use tracing::{TracingError, init_tracing};
