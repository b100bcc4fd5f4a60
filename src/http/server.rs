//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the report and health handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and shut down gracefully

use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ReportServiceConfig;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::model::{DomainId, ReportRequest};
use crate::report::{ReportOrchestrator, ReportOutcome};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub reports: ReportOrchestrator,
}

/// Paging query parameters. Absent values mean "unpaged".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub page_size: i32,
    #[serde(default)]
    pub page_number: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub version: String,
    pub status: String,
    pub license_breaker: String,
}

/// HTTP server for the report service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ReportServiceConfig, reports: ReportOrchestrator) -> Self {
        let state = AppState { reports };
        let router = Self::build_router(
            Duration::from_secs(config.listener.request_timeout_secs),
            state,
        );
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// A request that outlives `request_timeout` is answered with 500, the
    /// same class as a license call that timed out.
    pub fn build_router(request_timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/domains/{domain_id}/report", get(report_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        request_timeout,
                    )),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn report_handler(
    State(state): State<AppState>,
    Path(domain_id): Path<DomainId>,
    Query(query): Query<ReportQuery>,
) -> ReportOutcome {
    let request = ReportRequest::paged(domain_id, query.page_size, query.page_number);
    tracing::debug!(
        domain_id = %domain_id,
        page_size = request.page_size,
        page_number = request.page_number,
        "Report requested"
    );
    state.reports.get_report(request).await
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        license_breaker: state.reports.breaker_state().as_str().to_string(),
    })
}

async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    // A dropped sender also means shutdown.
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}
