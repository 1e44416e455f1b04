//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file.
//! Every field has a default so a minimal (or absent) config is usable;
//! environment overrides are applied by the loader afterwards.

use serde::{Deserialize, Serialize};

use crate::registry::{
    DOCUMENT_INGESTION, DOCUMENT_PROCESSING, ENTITY_EXTRACTION, TASK_ORCHESTRATION,
};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Downstream service endpoints.
    pub services: ServicesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting parameters. Accepted and validated, not enforced on
    /// the dispatch path.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum inbound body size in bytes (document uploads).
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// One downstream service endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the service (e.g., "http://localhost:8001").
    pub base_url: String,

    /// Per-service request timeout in seconds. Falls back to
    /// `timeouts.default_secs` when omitted.
    pub timeout_secs: Option<u64>,
}

/// The four downstream services of the document pipeline.
///
/// The set is closed on purpose: an explicit field per service means a
/// misspelled name fails at startup validation, not at first request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub document_ingestion: ServiceConfig,
    pub document_processing: ServiceConfig,
    pub entity_extraction: ServiceConfig,
    pub task_orchestration: ServiceConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        let service = |port: u16| ServiceConfig {
            base_url: format!("http://localhost:{port}"),
            timeout_secs: None,
        };
        Self {
            document_ingestion: service(8001),
            document_processing: service(8002),
            entity_extraction: service(8003),
            task_orchestration: service(8004),
        }
    }
}

impl ServicesConfig {
    /// Logical name and entry for every configured service.
    pub fn entries(&self) -> [(&'static str, &ServiceConfig); 4] {
        [
            (DOCUMENT_INGESTION, &self.document_ingestion),
            (DOCUMENT_PROCESSING, &self.document_processing),
            (ENTITY_EXTRACTION, &self.entity_extraction),
            (TASK_ORCHESTRATION, &self.task_orchestration),
        ]
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Default outbound timeout in seconds, used for services without a
    /// configured `timeout_secs`.
    pub default_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_secs: 30,
            request_secs: 60,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_requests: 100,
            window_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
