//! Per-request tracking context.
//!
//! # Responsibilities
//! - Generate or adopt an `X-Request-ID` as early as possible
//! - Capture a caller-supplied `X-Correlation-ID` when present
//! - Echo the request ID on the response for client-side correlation

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_CORRELATION_ID: &str = "x-correlation-id";

/// Tracking identifiers for one inbound request.
///
/// Created when the request enters the gateway, propagated to the backend
/// as headers, echoed into logs, and dropped once the response is sent.
/// Never shared across requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub correlation_id: Option<String>,
}

impl RequestContext {
    /// Build from inbound headers, generating a request ID when absent.
    /// A correlation ID is only ever adopted, never fabricated.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let correlation_id = headers
            .get(X_CORRELATION_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            request_id,
            correlation_id,
        }
    }
}

/// Middleware: attach a [`RequestContext`] to the request extensions and
/// echo the request ID on the response.
pub async fn inject_context(mut request: Request, next: Next) -> Response {
    let ctx = RequestContext::from_headers(request.headers());
    let request_id = ctx.request_id.clone();
    request.extensions_mut().insert(ctx);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
