//! Route handlers for the gateway surface.
//!
//! Handlers stay thin: extract parameters, build a `ProxyRequest`, dispatch,
//! and shape the backend response. Backend-originated error payloads are
//! relayed verbatim; only gateway-originated failures use the taxonomy.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::GatewayError;
use crate::http::envelope::envelope;

pub mod documents;
pub mod extractions;
pub mod processing;
pub mod system;
pub mod workflows;

/// Buffer a successful backend response into the canonical envelope, or
/// relay a backend-originated error payload verbatim at its own status.
pub(crate) async fn forward_enveloped(
    service: &str,
    upstream: reqwest::Response,
    success_status: StatusCode,
) -> Result<Response, GatewayError> {
    if !upstream.status().is_success() {
        return relay_error_payload(service, upstream).await;
    }
    let payload = read_payload(service, upstream).await?;
    Ok((success_status, envelope(payload)).into_response())
}

/// Read a backend body as JSON, falling back to the scalar rule for
/// non-JSON text and to null for empty bodies.
pub(crate) async fn read_payload(
    service: &str,
    upstream: reqwest::Response,
) -> Result<Value, GatewayError> {
    let text = upstream.text().await.map_err(|e| body_read_error(service, e))?;
    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// The gateway does not mask a backend's own error payload: body, status,
/// and content type are forwarded unchanged.
async fn relay_error_payload(
    service: &str,
    upstream: reqwest::Response,
) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let body = upstream
        .bytes()
        .await
        .map_err(|e| body_read_error(service, e))?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

fn body_read_error(service: &str, e: reqwest::Error) -> GatewayError {
    tracing::error!(service, error = %e, "Failed reading backend response body");
    GatewayError::ServiceUnavailable {
        service: service.to_string(),
        detail: "error reading backend response".to_string(),
    }
}
