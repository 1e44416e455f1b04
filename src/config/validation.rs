//! Configuration validation.
//!
//! Semantic checks over an already-parsed config (serde handles the
//! syntactic ones). Returns every failure, not just the first, so an
//! operator can fix a broken deployment in one pass.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a valid socket address: '{}'", config.listener.bind_address),
        ));
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "listener.max_body_bytes",
            "must be greater than zero",
        ));
    }

    for (name, service) in config.services.entries() {
        let field = format!("services.{}", name.replace('-', "_"));
        match Url::parse(&service.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::new(
                field.clone(),
                format!("unsupported URL scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                field.clone(),
                format!("invalid base URL '{}': {e}", service.base_url),
            )),
        }
        if service.timeout_secs == Some(0) {
            errors.push(ValidationError::new(
                format!("{field}.timeout_secs"),
                "must be greater than zero",
            ));
        }
    }

    if config.timeouts.default_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.default_secs",
            "must be greater than zero",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::new(
                "rate_limit.max_requests",
                "must be greater than zero when rate limiting is enabled",
            ));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::new(
                "rate_limit.window_secs",
                "must be greater than zero when rate limiting is enabled",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "not a valid socket address: '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
