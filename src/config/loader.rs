//! Configuration loading from disk and the process environment.
//!
//! A TOML file provides the base; environment variables override individual
//! values using the same names the pipeline's other services read
//! (`DOCUMENT_INGESTION_SERVICE_URL`, `API_GATEWAY_DEFAULT_TIMEOUT`, ...).

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, apply environment overrides, and
/// validate the result.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration from defaults and the environment alone.
pub fn from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut GatewayConfig) {
    let url_overrides = [
        ("DOCUMENT_INGESTION_SERVICE_URL", &mut config.services.document_ingestion),
        ("DOCUMENT_PROCESSING_SERVICE_URL", &mut config.services.document_processing),
        ("ENTITY_EXTRACTION_SERVICE_URL", &mut config.services.entity_extraction),
        ("TASK_ORCHESTRATION_SERVICE_URL", &mut config.services.task_orchestration),
    ];
    for (var, service) in url_overrides {
        if let Ok(value) = env::var(var) {
            service.base_url = value;
        }
    }

    if let Some(secs) = env_parsed::<u64>("API_GATEWAY_DEFAULT_TIMEOUT") {
        config.timeouts.default_secs = secs;
    }

    let host = env::var("API_GATEWAY_HOST").ok();
    let port = env_parsed::<u16>("API_GATEWAY_PORT");
    if host.is_some() || port.is_some() {
        let current: Vec<&str> = config.listener.bind_address.splitn(2, ':').collect();
        let new_host = host.unwrap_or_else(|| current[0].to_string());
        let new_port = port
            .map(|p| p.to_string())
            .unwrap_or_else(|| current.get(1).unwrap_or(&"8000").to_string());
        config.listener.bind_address = format!("{new_host}:{new_port}");
    }

    if let Some(enabled) = env_parsed::<bool>("ENABLE_RATE_LIMIT") {
        config.rate_limit.enabled = enabled;
    }
    if let Some(max) = env_parsed::<u32>("RATE_LIMIT_MAX_REQUESTS") {
        config.rate_limit.max_requests = max;
    }
    if let Some(secs) = env_parsed::<u64>("RATE_LIMIT_WINDOW_SECONDS") {
        config.rate_limit.window_secs = secs;
    }

    if let Ok(level) = env::var("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(enabled) = env_parsed::<bool>("ENABLE_METRICS") {
        config.observability.metrics_enabled = enabled;
    }
    if let Some(port) = env_parsed::<u16>("METRICS_PORT") {
        config.observability.metrics_address = format!("0.0.0.0:{port}");
    }
}

fn env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
    let value = env::var(var).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(var, value, "Ignoring unparsable environment override");
            None
        }
    }
}
