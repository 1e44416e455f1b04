//! Active probing of downstream health endpoints.
//!
//! # Responsibilities
//! - Probe each registered service's `GET /health` on demand
//! - Report probe results for the aggregate health endpoint
//!
//! # Design Decisions
//! - Probes use a fixed 5-second timeout, independent of the per-service
//!   dispatch timeouts
//! - Probes bypass the dispatcher and never write the health tracker; the
//!   tracker is mutated only by dispatch outcomes

use std::time::Duration;

use serde::Serialize;

use crate::observability::metrics;
use crate::registry::{ServiceDescriptor, ServiceRegistry};

/// Probe timeout override. Deliberately not read from the timeout config.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of probing one service's health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceProbe {
    pub service: String,
    pub url: String,
    pub status: ProbeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Unhealthy,
    Unreachable,
}

pub struct HealthProber {
    client: reqwest::Client,
}

impl HealthProber {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Probe every registered service, in registry (name) order.
    pub async fn probe_all(&self, registry: &ServiceRegistry) -> Vec<ServiceProbe> {
        let mut results = Vec::new();
        for descriptor in registry.all() {
            results.push(self.probe(descriptor).await);
        }
        results
    }

    async fn probe(&self, descriptor: &ServiceDescriptor) -> ServiceProbe {
        let url = match descriptor.base_url.join("/health") {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(service = %descriptor.name, error = %e, "Failed to build health probe URL");
                return ServiceProbe {
                    service: descriptor.name.clone(),
                    url: descriptor.base_url.to_string(),
                    status: ProbeStatus::Unreachable,
                };
            }
        };

        let status = match self
            .client
            .get(url.clone())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ProbeStatus::Healthy,
            Ok(response) => {
                tracing::warn!(
                    service = %descriptor.name,
                    status = %response.status(),
                    "Health probe failed: non-success status"
                );
                ProbeStatus::Unhealthy
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(service = %descriptor.name, "Health probe failed: timeout");
                ProbeStatus::Unreachable
            }
            Err(e) => {
                tracing::warn!(service = %descriptor.name, error = %e, "Health probe failed: connection error");
                ProbeStatus::Unreachable
            }
        };

        metrics::record_probe(&descriptor.name, status == ProbeStatus::Healthy);

        ServiceProbe {
            service: descriptor.name.clone(),
            url: url.to_string(),
            status,
        }
    }
}

impl Default for HealthProber {
    fn default() -> Self {
        Self::new()
    }
}
