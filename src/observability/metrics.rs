//! Metrics collection and exposition.
//!
//! # Metrics
//! - `report_requests_total` (counter): report requests by outcome
//! - `report_request_duration_seconds` (histogram): end-to-end latency
//! - `license_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `license_breaker_transitions_total` (counter): transitions by target state

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::BreakerState;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished report request.
pub fn record_report(outcome: &'static str, start: Instant) {
    ::metrics::counter!("report_requests_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("report_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Publish the breaker's current state.
pub fn record_breaker_state(breaker: &'static str, state: BreakerState) {
    ::metrics::gauge!("license_breaker_state", "breaker" => breaker).set(state.as_gauge());
}

/// Record the breaker entering `state`.
pub fn record_breaker_transition(breaker: &'static str, state: BreakerState) {
    record_breaker_state(breaker, state);
    ::metrics::counter!(
        "license_breaker_transitions_total",
        "breaker" => breaker,
        "to" => state.as_str()
    )
    .increment(1);
}
