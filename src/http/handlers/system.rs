//! Gateway self-reporting: liveness, aggregate service health, statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::http::envelope::envelope;
use crate::http::server::AppState;
use crate::proxy::context::RequestContext;

/// Rolling request counters, reset on restart.
#[derive(Debug)]
pub struct GatewayStats {
    started: Instant,
    start_time: DateTime<Utc>,
    requests: AtomicU64,
    errors: AtomicU64,
}

impl GatewayStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            start_time: Utc::now(),
            requests: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

impl Default for GatewayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware: count every inbound request and every 5xx answer.
pub async fn track_stats(
    State(stats): State<Arc<GatewayStats>>,
    request: Request,
    next: Next,
) -> Response {
    stats.requests.fetch_add(1, Ordering::Relaxed);
    let response = next.run(request).await;
    if response.status().is_server_error() {
        stats.errors.fetch_add(1, Ordering::Relaxed);
    }
    response
}

/// `GET /health` and `GET /api/v1/health` — gateway liveness. No fan-out.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "api-gateway" }))
}

/// `GET /api/v1/health/services` — probe every registered backend.
///
/// Each entry reports the live probe result next to the circuit breaker's
/// current view of the service.
pub async fn services_health(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Json<Value> {
    tracing::debug!(request_id = %ctx.request_id, "Probing downstream services");

    let probes = state.prober.probe_all(&state.registry).await;
    let services: Vec<Value> = probes
        .into_iter()
        .map(|probe| {
            let tracked = state.health.get(&probe.service);
            json!({
                "service": probe.service,
                "url": probe.url,
                "probe": probe.status,
                "state": tracked,
            })
        })
        .collect();

    envelope(json!({ "services": services }))
}

/// `GET /api/v1/stats` — uptime, counters, and per-service health summary.
pub async fn stats(State(state): State<AppState>) -> Json<Value> {
    let mut services = Map::new();
    for descriptor in state.registry.all() {
        services.insert(
            descriptor.name.clone(),
            json!({
                "url": descriptor.base_url.as_str(),
                "state": state.health.get(&descriptor.name),
            }),
        );
    }

    envelope(json!({
        "gateway": {
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_secs": state.stats.started.elapsed().as_secs(),
            "start_time": state.stats.start_time.to_rfc3339(),
            "request_count": state.stats.requests.load(Ordering::Relaxed),
            "error_count": state.stats.errors.load(Ordering::Relaxed),
        },
        "services": Value::Object(services),
    }))
}
