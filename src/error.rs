//! Gateway error taxonomy and central rendering.
//!
//! # Responsibilities
//! - Define the closed set of failures the gateway itself can produce
//! - Map each kind to a stable machine code and HTTP status
//! - Render every typed error exactly once, in one place
//!
//! # Design Decisions
//! - Backend-originated error bodies are never wrapped in this taxonomy;
//!   the dispatcher passes them through untouched
//! - Unrecognized failures render as a generic 500; the source is logged
//!   but never echoed to the caller

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Closed set of gateway failures.
///
/// Every variant carries a human-readable message; the machine code and
/// HTTP status are fixed per kind.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("{resource} with ID '{id}' not found")]
    NotFound { resource: String, id: String },

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("Service '{service}' is currently unavailable: {detail}")]
    ServiceUnavailable { service: String, detail: String },

    #[error("Request to service '{service}' timed out after {timeout:?}")]
    ServiceTimeout { service: String, timeout: Duration },

    #[error("{0}")]
    DataProcessing(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    RateLimitExceeded(String),

    #[error("{0}")]
    Application(String),

    /// Catch-all for failures outside the taxonomy. The display text is a
    /// fixed message so the underlying cause never reaches the wire.
    #[error("An unexpected error occurred")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Stable machine code, defaulting to the kind's name.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::NotFound { .. } => "NOT_FOUND_ERROR",
            GatewayError::Authentication(_) => "AUTHENTICATION_ERROR",
            GatewayError::Authorization(_) => "AUTHORIZATION_ERROR",
            GatewayError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE_ERROR",
            GatewayError::ServiceTimeout { .. } => "SERVICE_TIMEOUT_ERROR",
            GatewayError::DataProcessing(_) => "DATA_PROCESSING_ERROR",
            GatewayError::Configuration(_) => "CONFIGURATION_ERROR",
            GatewayError::RateLimitExceeded(_) => "RATE_LIMIT_EXCEEDED_ERROR",
            GatewayError::Application(_) => "APPLICATION_ERROR",
            GatewayError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Authentication(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Authorization(_) => StatusCode::FORBIDDEN,
            GatewayError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::ServiceTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::DataProcessing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Application(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log once, at a level matching the kind's severity.
    fn log(&self) {
        match self {
            GatewayError::NotFound { .. } => {
                tracing::info!(code = self.code(), "Resource not found: {}", self);
            }
            GatewayError::Validation(_)
            | GatewayError::Authentication(_)
            | GatewayError::Authorization(_)
            | GatewayError::RateLimitExceeded(_) => {
                tracing::warn!(code = self.code(), "{}", self);
            }
            GatewayError::Internal(source) => {
                tracing::error!(code = self.code(), error = %source, "Unhandled failure");
            }
            _ => {
                tracing::error!(code = self.code(), "{}", self);
            }
        }
    }
}

/// Typed error parts, stashed in response extensions by [`IntoResponse`] and
/// turned into the wire envelope by [`render_error_envelope`].
#[derive(Debug, Clone)]
pub struct ErrorParts {
    pub code: &'static str,
    pub message: String,
    pub status: StatusCode,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.log();
        let parts = ErrorParts {
            code: self.code(),
            message: self.to_string(),
            status: self.status(),
        };
        let mut response = Response::new(Body::empty());
        *response.status_mut() = parts.status;
        response.extensions_mut().insert(parts);
        response
    }
}

/// Central error handler.
///
/// Attaches the request path and renders any typed error produced further
/// down the stack as `{"error": code, "detail": message, "path": path}`.
/// Responses without error parts pass through unchanged, so backend error
/// payloads relayed by the dispatcher are not rewritten here.
pub async fn render_error_envelope(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(parts) = response.extensions().get::<ErrorParts>().cloned() else {
        return response;
    };

    let body = Json(json!({
        "error": parts.code,
        "detail": parts.message,
        "path": path,
    }));

    let mut rendered = (parts.status, body).into_response();
    if parts.status == StatusCode::UNAUTHORIZED {
        rendered
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    rendered
}
