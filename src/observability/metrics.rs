//! Metrics collection and exposition.
//!
//! # Metrics
//! - `external_calls_total` (counter): attempts by endpoint, operation, outcome
//! - `external_call_duration_seconds` (histogram): per-attempt latency
//! - `external_retries_total` (counter): attempts beyond the first
//! - `circuit_breaker_state` (gauge): 0=closed, 1=half-open, 2=open
//! - `circuit_breaker_rejections_total` (counter): calls failed fast
//! - `http_requests_total` (counter): inbound requests by method, route, status
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::resilience::BreakerState;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_external_call(endpoint: &str, operation: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "external_calls_total",
        "endpoint" => endpoint.to_string(),
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "external_call_duration_seconds",
        "endpoint" => endpoint.to_string(),
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_retry(endpoint: &str, operation: &'static str) {
    counter!(
        "external_retries_total",
        "endpoint" => endpoint.to_string(),
        "operation" => operation
    )
    .increment(1);
}

pub fn record_breaker_state(endpoint: &str, state: BreakerState) {
    let value = match state {
        BreakerState::Closed => 0.0,
        BreakerState::HalfOpen => 1.0,
        BreakerState::Open => 2.0,
    };
    gauge!("circuit_breaker_state", "endpoint" => endpoint.to_string()).set(value);
}

pub fn record_breaker_rejection(endpoint: &str) {
    counter!("circuit_breaker_rejections_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_request(method: &str, route: &str, status: u16) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
