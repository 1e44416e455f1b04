//! Shared health state store.
//!
//! The map the circuit breaker lives in: consulted before and updated after
//! every dispatch, reset on process restart.

use dashmap::DashMap;

use crate::health::state::HealthState;

/// Per-service health map.
///
/// `get` and `set` are independent operations; the read-then-write pair a
/// dispatch performs is not transacted. Two concurrent dispatches to the
/// same service may interleave, in which case the last writer wins. Each
/// write is still derived from that call's own outcome, never another's.
#[derive(Debug, Default)]
pub struct HealthTracker {
    states: DashMap<String, HealthState>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    /// Current state, `Healthy` for services never seen.
    pub fn get(&self, service: &str) -> HealthState {
        self.states
            .get(service)
            .map(|entry| *entry.value())
            .unwrap_or(HealthState::Healthy)
    }

    /// Overwrite the state unconditionally.
    pub fn set(&self, service: &str, state: HealthState) {
        self.states.insert(service.to_string(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_services_default_to_healthy() {
        let tracker = HealthTracker::new();
        assert_eq!(tracker.get("document-ingestion"), HealthState::Healthy);
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let tracker = HealthTracker::new();
        tracker.set("document-ingestion", HealthState::Failed);
        assert_eq!(tracker.get("document-ingestion"), HealthState::Failed);
        tracker.set("document-ingestion", HealthState::Degraded);
        assert_eq!(tracker.get("document-ingestion"), HealthState::Degraded);
    }

    #[test]
    fn services_are_tracked_independently() {
        let tracker = HealthTracker::new();
        tracker.set("document-ingestion", HealthState::Failed);
        assert_eq!(tracker.get("entity-extraction"), HealthState::Healthy);
    }
}
