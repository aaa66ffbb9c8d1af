//! Generation metrics.
//!
//! # Metrics
//! - `routegen_routes_generated_total` (counter): routes produced, by generator
//! - `routegen_generation_failures_total` (counter): failed passes, by generator
//!
//! # Design Decisions
//! - No recorder is installed here; the host process owns exposition
//! - Without a recorder every update is a no-op

pub const ROUTES_GENERATED: &str = "routegen_routes_generated_total";
pub const GENERATION_FAILURES: &str = "routegen_generation_failures_total";

pub fn record_routes_generated(generator: &str, count: usize) {
    metrics::counter!(ROUTES_GENERATED, "generator" => generator.to_string()).increment(count as u64);
}

pub fn record_generation_failure(generator: &str) {
    metrics::counter!(GENERATION_FAILURES, "generator" => generator.to_string()).increment(1);
}
