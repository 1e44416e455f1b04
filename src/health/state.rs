//! Service health state machine.
//!
//! # States
//! - Healthy: dispatches proceed normally
//! - Degraded: a timeout was observed; advisory only, dispatches proceed
//! - Failed: a server or transport failure was observed; dispatches are
//!   short-circuited (circuit open)
//!
//! # State Transitions
//! ```text
//! any     → Healthy:  success (status < 500, including 4xx)
//! any     → Degraded: timeout
//! any     → Failed:   server error or transport error
//! current → current:  client error (no transition)
//! ```
//!
//! # Design Decisions
//! - Transitions are edge-triggered by the single most recent outcome;
//!   there are no rolling counters or thresholds
//! - One success always closes the circuit

use axum::http::StatusCode;
use serde::Serialize;

/// Health of one downstream service as seen by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Failed,
}

impl HealthState {
    /// Next state after observing `outcome`.
    pub fn observe(self, outcome: Outcome) -> HealthState {
        match outcome {
            Outcome::Success => HealthState::Healthy,
            Outcome::ClientError => self,
            Outcome::Timeout => HealthState::Degraded,
            Outcome::ServerError | Outcome::TransportError => HealthState::Failed,
        }
    }

    /// Whether dispatch must short-circuit without touching the network.
    pub fn blocks_dispatch(self) -> bool {
        matches!(self, HealthState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Degraded => "degraded",
            HealthState::Failed => "failed",
        }
    }
}

/// Classification of a single dispatch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ClientError,
    ServerError,
    Timeout,
    TransportError,
}

impl Outcome {
    /// Classify a received response status.
    ///
    /// Anything below 500 counts as a success for gating purposes: a 4xx
    /// proves the backend is up and answering. Timeouts and transport
    /// failures are classified at the call site, before a status exists.
    pub fn from_status(status: StatusCode) -> Outcome {
        if status.is_server_error() {
            Outcome::ServerError
        } else {
            Outcome::Success
        }
    }
}
