//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_decisions_total` (counter): gating outcomes by stage
//! - `gateway_usage_records_total` (counter): usage recording outcomes
//! - `gateway_response_chunks_total` / `gateway_response_bytes_total` (counters): intercepted body traffic
//! - `gateway_remote_call_duration_seconds` (histogram): remote authority latency by operation

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of the gating checks for one request.
pub fn record_decision(outcome: &'static str, stage: &'static str) {
    metrics::counter!("gateway_decisions_total", "outcome" => outcome, "stage" => stage).increment(1);
}

/// Record the outcome of one usage recording attempt.
pub fn record_usage(result: &'static str) {
    metrics::counter!("gateway_usage_records_total", "result" => result).increment(1);
}

/// Record one chunk passing through the response interceptor.
pub fn record_chunk(bytes: usize) {
    metrics::counter!("gateway_response_chunks_total").increment(1);
    metrics::counter!("gateway_response_bytes_total").increment(bytes as u64);
}

/// Record a remote authority call.
pub fn record_remote_call(op: &'static str, ok: bool, start: Instant) {
    let result = if ok { "ok" } else { "error" };
    metrics::histogram!("gateway_remote_call_duration_seconds", "op" => op, "result" => result)
        .record(start.elapsed().as_secs_f64());
}
