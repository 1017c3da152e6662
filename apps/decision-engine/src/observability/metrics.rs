//! Metrics for parsing, simulation, price fetching and moats.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use metrics::{counter, histogram};

// ============================================================================
// Intent Parsing Metrics
// ============================================================================

/// Record a parsed decision.
///
/// # Arguments
///
/// * `decision_type` - Decision type (e.g., "market_shock", "unrecognized")
/// * `confidence` - Confidence score in `[0, 1]`
pub fn record_parse(decision_type: &str, confidence: f64) {
    counter!(
        "decision_parses_total",
        "decision_type" => decision_type.to_string()
    )
    .increment(1);

    histogram!("decision_parse_confidence").record(confidence);
}

// ============================================================================
// Simulation Metrics
// ============================================================================

/// Record one simulation run.
///
/// # Arguments
///
/// * `kind` - Run kind ("baseline", "scenario", "anchor")
/// * `n_paths` - Paths simulated
/// * `latency_seconds` - Wall-clock duration
pub fn record_simulation(kind: &str, n_paths: u32, latency_seconds: f64) {
    counter!("simulation_paths_total", "kind" => kind.to_string()).increment(u64::from(n_paths));

    histogram!("simulation_latency_seconds", "kind" => kind.to_string()).record(latency_seconds);
}

/// Record a completed evaluation.
///
/// # Arguments
///
/// * `verdict` - Verdict label
/// * `latency_seconds` - Time from request to verdict, fetching included
pub fn record_evaluation(verdict: &str, latency_seconds: f64) {
    counter!("decision_evaluations_total", "verdict" => verdict.to_string()).increment(1);

    histogram!("decision_evaluation_latency_seconds").record(latency_seconds);
}

// ============================================================================
// Market Data Metrics
// ============================================================================

/// Record a per-ticker price fetch.
///
/// # Arguments
///
/// * `outcome` - "ok", "timeout" or "error"
/// * `latency_seconds` - Fetch duration
pub fn record_price_fetch(outcome: &str, latency_seconds: f64) {
    counter!("price_fetches_total", "outcome" => outcome.to_string()).increment(1);

    histogram!("price_fetch_latency_seconds", "outcome" => outcome.to_string())
        .record(latency_seconds);
}

/// Record a price cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("price_cache_lookups_total", "result" => result).increment(1);
}

// ============================================================================
// Tax and Moat Metrics
// ============================================================================

/// Record a tax computation.
///
/// # Arguments
///
/// * `jurisdiction` - Jurisdiction code as requested
/// * `status` - "ok", "short_circuit" or "unsupported"
pub fn record_tax_computation(jurisdiction: &str, status: &str) {
    counter!(
        "tax_computations_total",
        "jurisdiction" => jurisdiction.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a moat outcome.
pub fn record_moat(moat: &str, applicable: bool) {
    counter!(
        "moat_results_total",
        "moat" => moat.to_string(),
        "applicable" => applicable.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_parse("market_shock", 0.75);
        record_simulation("baseline", 1000, 0.05);
        record_evaluation("NEUTRAL", 0.1);
        record_price_fetch("ok", 0.01);
        record_cache_lookup(true);
        record_tax_computation("US", "ok");
        record_moat("correlation_risk", false);
    }
}
