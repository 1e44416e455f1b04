//! Downstream dispatch.
//!
//! The single place outbound calls are made and classified. Every dispatch
//! follows the same strict order: resolve the service, consult the circuit
//! gate, compute the effective timeout, merge tracking headers, issue
//! exactly one HTTP call (no retries), classify the outcome, and write the
//! health tracker exactly once. The short-circuit path performs zero I/O
//! and zero writes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderValue, Method};
use serde_json::Value;

use crate::error::GatewayError;
use crate::health::state::Outcome;
use crate::health::tracker::HealthTracker;
use crate::observability::metrics;
use crate::proxy::context::{RequestContext, X_CORRELATION_ID, X_REQUEST_ID};
use crate::registry::ServiceRegistry;

/// Body forwarded to the backend.
#[derive(Default)]
pub enum ProxyBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// One outbound request, built by a route handler.
#[derive(Default)]
pub struct ProxyRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: ProxyBody,
    pub timeout_override: Option<Duration>,
}

impl ProxyRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = ProxyBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = ProxyBody::Multipart(form);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }
}

/// Forwards requests to downstream services under circuit-breaker policy.
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
    health: Arc<HealthTracker>,
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new(registry: Arc<ServiceRegistry>, health: Arc<HealthTracker>) -> Self {
        Self {
            registry,
            health,
            client: reqwest::Client::new(),
        }
    }

    /// Forward one request to `service` and return the raw backend response.
    ///
    /// Responses with any status below 500 are returned as-is; 5xx responses
    /// are also returned as-is (the caller decides how to surface them), but
    /// mark the service failed. Transport failures and timeouts are
    /// converted to taxonomy errors here and never escape raw.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        service: &str,
        request: ProxyRequest,
    ) -> Result<reqwest::Response, GatewayError> {
        let descriptor = self.registry.resolve(service)?;

        let state_before = self.health.get(service);
        if state_before.blocks_dispatch() {
            tracing::warn!(
                request_id = %ctx.request_id,
                service,
                "Circuit open, refusing dispatch"
            );
            return Err(GatewayError::ServiceUnavailable {
                service: service.to_string(),
                detail: "circuit open".to_string(),
            });
        }

        let timeout = request.timeout_override.unwrap_or(descriptor.timeout);
        let url = descriptor.base_url.join(&request.path).map_err(|e| {
            GatewayError::Configuration(format!(
                "invalid path '{}' for service '{service}': {e}",
                request.path
            ))
        })?;

        let headers = merge_tracking_headers(request.headers, ctx);

        tracing::debug!(
            request_id = %ctx.request_id,
            service,
            method = %request.method,
            url = %url,
            timeout_secs = timeout.as_secs_f64(),
            "Dispatching to backend"
        );

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(headers)
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            ProxyBody::Empty => builder,
            ProxyBody::Json(value) => builder.json(&value),
            ProxyBody::Multipart(form) => builder.multipart(form),
        };

        let started = Instant::now();
        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                let outcome = Outcome::from_status(status);
                self.record(service, state_before, outcome);
                metrics::record_dispatch(service, request.method.as_str(), status.as_u16(), started);
                tracing::debug!(
                    request_id = %ctx.request_id,
                    service,
                    status = %status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Backend responded"
                );
                Ok(response)
            }
            Err(e) if e.is_timeout() => {
                self.record(service, state_before, Outcome::Timeout);
                tracing::error!(
                    request_id = %ctx.request_id,
                    service,
                    timeout_secs = timeout.as_secs_f64(),
                    "Backend did not respond within the effective timeout"
                );
                Err(GatewayError::ServiceTimeout {
                    service: service.to_string(),
                    timeout,
                })
            }
            Err(e) => {
                self.record(service, state_before, Outcome::TransportError);
                tracing::error!(
                    request_id = %ctx.request_id,
                    service,
                    error = %e,
                    "Transport failure before any response"
                );
                Err(GatewayError::ServiceUnavailable {
                    service: service.to_string(),
                    detail: "connection failed".to_string(),
                })
            }
        }
    }

    /// The single health write of a dispatched call. The transition is
    /// computed from the state read before the call, so each call's
    /// read/write pair is self-consistent even when concurrent dispatches
    /// interleave.
    fn record(&self, service: &str, state_before: crate::health::HealthState, outcome: Outcome) {
        let next = state_before.observe(outcome);
        if next != state_before {
            tracing::info!(
                service,
                from = state_before.as_str(),
                to = next.as_str(),
                "Service health state changed"
            );
        }
        self.health.set(service, next);
        metrics::record_service_health(service, next);
    }
}

/// Strip hop-specific headers and inject tracking identifiers.
///
/// The request ID always exists in the context; the correlation ID is only
/// forwarded when the caller supplied one, never fabricated here.
fn merge_tracking_headers(mut headers: HeaderMap, ctx: &RequestContext) -> HeaderMap {
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        headers.insert(X_REQUEST_ID, value);
    }
    if let Some(correlation_id) = &ctx.correlation_id {
        if let Ok(value) = HeaderValue::from_str(correlation_id) {
            headers.insert(X_CORRELATION_ID, value);
        }
    }
    headers
}
