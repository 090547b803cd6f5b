//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, protocol errors)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint, status, outcome
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_protocol_errors_total` (counter): legacy error envelopes sent,
//!   by endpoint and outcome
//!
//! # Design Decisions
//! - Labels use the endpoint pattern, never the raw request path, so an
//!   unknown path cannot explode cardinality

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Outcome;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Record one finished request.
pub fn record_request(endpoint: &str, status: u16, outcome: &str, start: Instant) {
    let labels = [
        ("endpoint", endpoint.to_string()),
        ("status", status.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a legacy error envelope sent in place of a result.
pub fn record_protocol_error(endpoint: &str, outcome: Outcome) {
    counter!(
        "gateway_protocol_errors_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
