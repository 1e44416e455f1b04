//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging with the request ID flowing through all subsystems
//! - Metrics are cheap and live on their own listener
//! - Taxonomy errors are logged exactly once, by the central handler

pub mod logging;
pub mod metrics;
