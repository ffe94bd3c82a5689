//! Metrics collection.
//!
//! # Metrics
//! - `normalizer_outcomes_total` (counter): classified outcomes by kind
//! - `normalizer_request_duration_seconds` (histogram): end-to-end call latency
//! - `normalizer_cache_lookups_total` (counter): cache lookups by result
//! - `normalizer_cache_entries` (gauge): live cache entries
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs a recorder
//! - Labels are static strings to keep cardinality bounded

use std::time::Instant;

/// Record one classified outcome (`success`, `biz_error`, `http_status`, ...).
pub fn record_outcome(kind: &'static str) {
    metrics::counter!("normalizer_outcomes_total", "kind" => kind).increment(1);
}

/// Record the latency of a call started at `start`.
pub fn record_request_duration(method: &str, start: Instant) {
    metrics::histogram!(
        "normalizer_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("normalizer_cache_lookups_total", "result" => result).increment(1);
}

/// Record the number of live cache entries.
pub fn record_cache_size(size: usize) {
    metrics::gauge!("normalizer_cache_entries").set(size as f64);
}
