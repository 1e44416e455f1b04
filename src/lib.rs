//! InsightDocs API Gateway
//!
//! Fronts the four downstream services of the document processing pipeline
//! (document ingestion, document processing, entity extraction, task
//! orchestration) and forwards client requests to them.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                  API GATEWAY                    │
//!                      │                                                 │
//!   Client Request     │  ┌────────┐   ┌──────────┐   ┌─────────────┐   │
//!   ──────────────────▶│  │  http  │──▶│ handlers │──▶│  registry   │   │
//!                      │  │ server │   │          │   │ (name→addr) │   │
//!                      │  └────────┘   └────┬─────┘   └──────┬──────┘   │
//!                      │                    │                │          │
//!                      │                    ▼                ▼          │
//!                      │               ┌─────────────────────────┐      │
//!                      │               │    proxy dispatcher      │─────┼──▶ Backend
//!                      │               │  gate → call → classify  │      │    Services
//!                      │               └────────────┬────────────┘      │
//!                      │                            │                   │
//!   Client Response    │  ┌──────────┐   ┌──────────▼───────────┐       │
//!   ◀──────────────────┼──│ envelope │◀──│    health tracker    │       │
//!                      │  │ /stream  │   │   (circuit breaker)  │       │
//!                      │  └──────────┘   └──────────────────────┘       │
//!                      │                                                 │
//!                      │  config · error taxonomy · observability ·      │
//!                      │  lifecycle                                      │
//!                      └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod registry;

// Traffic management
pub mod health;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
