//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): dispatched requests by service,
//!   method, status
//! - `gateway_request_duration_seconds` (histogram): backend latency
//! - `gateway_service_health` (gauge): 2=healthy, 1=degraded, 0=failed
//! - `gateway_probe_success` (gauge): last active probe result per service
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations inside the metrics crate)
//! - The exporter runs on its own listener, separate from the API port

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::state::HealthState;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched backend request.
pub fn record_dispatch(service: &str, method: &str, status: u16, started: Instant) {
    let labels = [
        ("service", service.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", &labels)
        .record(started.elapsed().as_secs_f64());
}

/// Record the circuit breaker's view of a service.
pub fn record_service_health(service: &str, state: HealthState) {
    let value = match state {
        HealthState::Healthy => 2.0,
        HealthState::Degraded => 1.0,
        HealthState::Failed => 0.0,
    };
    gauge!("gateway_service_health", "service" => service.to_string()).set(value);
}

/// Record an active probe result.
pub fn record_probe(service: &str, healthy: bool) {
    gauge!("gateway_probe_success", "service" => service.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
