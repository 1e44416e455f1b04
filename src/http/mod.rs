//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, explicit routing table, middleware)
//!     → handlers/ (extract parameters, dispatch, shape response)
//!     → envelope.rs (canonical {data, metadata} wrapper)
//!     → send to client
//! ```

pub mod envelope;
pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
