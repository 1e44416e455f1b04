//! HTTP server setup and routing table.
//!
//! # Responsibilities
//! - Build the axum router with every route registered explicitly
//! - Wire up middleware (tracing, request context, stats, central error
//!   rendering, timeout, body limits)
//! - Construct and share the dispatch subsystems via `AppState`
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::error::{self, GatewayError};
use crate::health::probe::HealthProber;
use crate::health::tracker::HealthTracker;
use crate::http::handlers::system::GatewayStats;
use crate::http::handlers::{documents, extractions, processing, system, workflows};
use crate::proxy::context;
use crate::proxy::dispatcher::Dispatcher;
use crate::registry::ServiceRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub registry: Arc<ServiceRegistry>,
    pub health: Arc<HealthTracker>,
    pub prober: Arc<HealthProber>,
    pub stats: Arc<GatewayStats>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The service registry is built here, so a bad service entry fails at
    /// startup rather than at first request.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let registry = Arc::new(ServiceRegistry::from_config(&config)?);
        let health = Arc::new(HealthTracker::new());
        let dispatcher = Arc::new(Dispatcher::new(registry.clone(), health.clone()));

        let state = AppState {
            dispatcher,
            registry,
            health,
            prober: Arc::new(HealthProber::new()),
            stats: Arc::new(GatewayStats::new()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Explicit routing table, built once at startup.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/health", get(system::health))
            .route("/health/services", get(system::services_health))
            .route("/stats", get(system::stats))
            .route(
                "/documents",
                post(documents::upload_document).get(documents::list_documents),
            )
            .route("/documents/{document_id}", get(documents::get_document))
            .route(
                "/documents/{document_id}/download",
                get(documents::download_document),
            )
            .route(
                "/document-processing",
                post(processing::process_document).get(processing::list_processing_jobs),
            )
            .route(
                "/document-processing/{job_id}",
                get(processing::get_processing_status),
            )
            .route("/extractions", post(extractions::extract_entities))
            .route("/extractions/entity-types", get(extractions::entity_types))
            .route(
                "/extractions/{job_id}",
                get(extractions::get_extraction_result),
            )
            .route(
                "/workflows",
                post(workflows::create_workflow).get(workflows::list_workflows),
            )
            .route("/workflows/types", get(workflows::workflow_types))
            .route("/workflows/{workflow_id}", get(workflows::get_workflow));

        Router::new()
            .route("/health", get(system::health))
            .nest("/api/v1", api)
            .with_state(state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(context::inject_context))
                    .layer(middleware::from_fn_with_state(
                        state.stats.clone(),
                        system::track_stats,
                    ))
                    .layer(middleware::from_fn(error::render_error_envelope))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(DefaultBodyLimit::max(config.listener.max_body_bytes)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
