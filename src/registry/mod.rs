//! Downstream service registry.
//!
//! # Responsibilities
//! - Map logical service names to base address and configured timeout
//! - Fail fast: bad entries are rejected at startup, unknown names at
//!   resolve time with a configuration error
//!
//! # Design Decisions
//! - Read-only after startup; shared via Arc without locking
//! - The per-service timeout is materialized here (configured value or the
//!   global default), so callers see one authoritative duration

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Logical names of the downstream services.
pub const DOCUMENT_INGESTION: &str = "document-ingestion";
pub const DOCUMENT_PROCESSING: &str = "document-processing";
pub const ENTITY_EXTRACTION: &str = "entity-extraction";
pub const TASK_ORCHESTRATION: &str = "task-orchestration";

/// Immutable description of one downstream service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub base_url: Url,
    pub timeout: Duration,
}

/// Static name → descriptor mapping, built once at startup.
#[derive(Debug)]
pub struct ServiceRegistry {
    services: HashMap<String, ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Build the registry from validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let default_timeout = Duration::from_secs(config.timeouts.default_secs);
        let mut services = HashMap::new();

        for (name, entry) in config.services.entries() {
            let base_url = Url::parse(&entry.base_url).map_err(|e| {
                GatewayError::Configuration(format!(
                    "invalid base URL for service '{name}': {e}"
                ))
            })?;
            let timeout = entry
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(default_timeout);
            services.insert(
                name.to_string(),
                ServiceDescriptor {
                    name: name.to_string(),
                    base_url,
                    timeout,
                },
            );
        }

        Ok(Self { services })
    }

    /// Resolve a logical service name.
    pub fn resolve(&self, name: &str) -> Result<&ServiceDescriptor, GatewayError> {
        self.services
            .get(name)
            .ok_or_else(|| GatewayError::Configuration(format!("unknown service '{name}'")))
    }

    /// All registered descriptors, sorted by name for stable output.
    pub fn all(&self) -> Vec<&ServiceDescriptor> {
        let mut descriptors: Vec<_> = self.services.values().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_service() {
        let registry = ServiceRegistry::from_config(&GatewayConfig::default()).unwrap();
        let descriptor = registry.resolve(DOCUMENT_INGESTION).unwrap();
        assert_eq!(descriptor.base_url.as_str(), "http://localhost:8001/");
        assert_eq!(descriptor.timeout, Duration::from_secs(30));
    }

    #[test]
    fn resolve_unknown_service_is_a_configuration_error() {
        let registry = ServiceRegistry::from_config(&GatewayConfig::default()).unwrap();
        let err = registry.resolve("ghost").unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn resolve_is_idempotent() {
        let registry = ServiceRegistry::from_config(&GatewayConfig::default()).unwrap();
        let first = registry.resolve(ENTITY_EXTRACTION).unwrap().clone();
        let second = registry.resolve(ENTITY_EXTRACTION).unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn per_service_timeout_wins_over_default() {
        let mut config = GatewayConfig::default();
        config.services.document_processing.timeout_secs = Some(5);
        let registry = ServiceRegistry::from_config(&config).unwrap();
        assert_eq!(
            registry.resolve(DOCUMENT_PROCESSING).unwrap().timeout,
            Duration::from_secs(5)
        );
        assert_eq!(
            registry.resolve(DOCUMENT_INGESTION).unwrap().timeout,
            Duration::from_secs(30)
        );
    }

    #[test]
    fn all_is_sorted_by_name() {
        let registry = ServiceRegistry::from_config(&GatewayConfig::default()).unwrap();
        let names: Vec<_> = registry.all().iter().map(|d| d.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                DOCUMENT_INGESTION,
                DOCUMENT_PROCESSING,
                ENTITY_EXTRACTION,
                TASK_ORCHESTRATION,
            ]
        );
    }
}
