//! Backend health subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch outcome (proxy::dispatcher)
//!     → state.rs (classification + transition table)
//!     → tracker.rs (shared per-service state map)
//!     → consulted by the next dispatch (circuit gate)
//!
//! on demand (system handlers):
//!     probe.rs → GET /health per service, 5s override
//! ```

pub mod probe;
pub mod state;
pub mod tracker;

pub use probe::{HealthProber, ProbeStatus, ServiceProbe};
pub use state::{HealthState, Outcome};
pub use tracker::HealthTracker;
