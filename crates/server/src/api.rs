//! HTTP API for reorder reports, health checks and Prometheus metrics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use reorder_lib::{
    health::ComponentStatus, HealthRegistry, ReportContext, ServiceMetrics, StructuredLogger,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ReportContext>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        context: Arc<ReportContext>,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            context,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Query parameters for the report endpoint; a missing season falls through
/// to the empty string and is rejected as invalid
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    season: String,
}

/// Reorder report endpoint - 200 with the sorted report, 400 for an invalid
/// season, 500 when the fitted collaborators fail
async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    let start = Instant::now();

    match state.context.build_report_for_label(&params.season) {
        Ok(entries) => {
            let elapsed = start.elapsed();
            state.metrics.observe_report_latency(elapsed.as_secs_f64());
            state.metrics.inc_reports_generated();
            state
                .logger
                .log_report(&params.season, entries.len(), elapsed.as_millis());
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(err) => {
            let status = if err.is_client_error() {
                state.metrics.inc_invalid_season_requests();
                StatusCode::BAD_REQUEST
            } else {
                state.metrics.inc_report_errors();
                StatusCode::INTERNAL_SERVER_ERROR
            };
            state
                .logger
                .log_report_error(&params.season, &err.to_string());
            let body = serde_json::json!({ "error": err.to_string() });
            (status, Json(body)).into_response()
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(report))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
