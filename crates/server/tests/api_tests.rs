//! Integration tests for the server API endpoints
//!
//! The router is rebuilt here against a stub encoder/predictor pair so the
//! handlers can be exercised without the fitted artifacts on disk.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use prometheus::{Encoder, TextEncoder};
use reorder_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    DemandPredictor, FittedLabelEncoder, MedicineRecord, ReportContext, ReportError, Season,
    ServiceMetrics, StructuredLogger,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ReportContext>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

#[derive(Debug, Deserialize)]
struct ReportParams {
    #[serde(default)]
    season: String,
}

async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    match state.context.build_report_for_label(&params.season) {
        Ok(entries) => {
            state.metrics.inc_reports_generated();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(err) => {
            let status = if err.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
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

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

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

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(report))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Demand stub keyed by name encoding
struct StubPredictor;

impl DemandPredictor for StubPredictor {
    fn predict(&self, name_enc: i64, _season_enc: i64) -> Result<f64, ReportError> {
        // Coughrelief=0 -> 20, ParacetamolX=1 -> 50
        Ok(match name_enc {
            0 => 20.0,
            _ => 50.0,
        })
    }
}

struct FailingPredictor;

impl DemandPredictor for FailingPredictor {
    fn predict(&self, name_enc: i64, season_enc: i64) -> Result<f64, ReportError> {
        Err(ReportError::PredictionUnavailable {
            name_enc,
            season_enc,
            detail: "artifact rejected the input".to_string(),
        })
    }
}

fn record(name: &str, month: u32, stock: f64) -> MedicineRecord {
    MedicineRecord {
        name: name.to_string(),
        manufacturer_name: "Acme Labs".to_string(),
        kind: "tablet".to_string(),
        pack_size_label: "strip of 10".to_string(),
        location_id: "LOC-01".to_string(),
        category: "analgesic".to_string(),
        season: "raw".to_string(),
        manufacture_date: NaiveDate::from_ymd_opt(2023, month, 10),
        expiry_date: None,
        stock_remaining: stock,
        quantity: 0.0,
    }
}

fn test_context(predictor: Arc<dyn DemandPredictor>) -> Arc<ReportContext> {
    let encoder = Arc::new(FittedLabelEncoder::from_classes(
        vec!["Coughrelief".to_string(), "ParacetamolX".to_string()],
        Season::ALL.iter().map(|s| s.to_string()).collect(),
    ));
    // Two Summer records with different shortfalls, one Monsoon record
    let records = vec![
        record("Coughrelief", 4, 5.0),    // Summer, demand 20 -> shortfall 15
        record("ParacetamolX", 5, 10.0),  // Summer, demand 50 -> shortfall 40
        record("ParacetamolX", 7, 100.0), // Monsoon, stock covers demand
    ];
    Arc::new(ReportContext::new(records, encoder, predictor).unwrap())
}

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::DATASET).await;
    health_registry.register(components::PREDICTOR).await;

    let state = Arc::new(AppState {
        context: test_context(Arc::new(StubPredictor)),
        health_registry,
        metrics: ServiceMetrics::new(),
        logger: StructuredLogger::new("reorder-server-test"),
    });
    let router = create_test_router(state.clone());

    (router, state)
}

async fn get_response(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_report_returns_sorted_entries() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_response(app, "/report?season=Summer").await;
    assert_eq!(status, StatusCode::OK);

    let entries: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["Medicine"], "ParacetamolX");
    assert_eq!(entries[0]["Predicted_Demand"], 50);
    assert_eq!(entries[0]["Reorder_Quantity"], 40);
    assert_eq!(entries[1]["Medicine"], "Coughrelief");
    assert_eq!(entries[1]["Reorder_Quantity"], 15);
}

#[tokio::test]
async fn test_report_serializes_fields_in_interface_order() {
    let (app, _state) = setup_test_app().await;

    let (_status, body) = get_response(app, "/report?season=Summer").await;
    let text = String::from_utf8(body).unwrap();

    let positions: Vec<usize> = [
        "\"Medicine\"",
        "\"Predicted_Demand\"",
        "\"Stock_Remaining\"",
        "\"Reorder_Quantity\"",
    ]
    .iter()
    .map(|field| text.find(field).expect(field))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
}

#[tokio::test]
async fn test_report_with_covered_stock_is_empty_not_error() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_response(app, "/report?season=Monsoon").await;
    assert_eq!(status, StatusCode::OK);

    let entries: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_report_rejects_invalid_season() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_response(app, "/report?season=Spring").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let message = error["error"].as_str().unwrap();
    for label in ["Summer", "Monsoon", "Autumn", "Winter"] {
        assert!(message.contains(label), "{message}");
    }
}

#[tokio::test]
async fn test_report_rejects_missing_season_param() {
    let (app, _state) = setup_test_app().await;

    let (status, _body) = get_response(app, "/report").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_season_is_case_sensitive() {
    let (app, _state) = setup_test_app().await;

    let (status, _body) = get_response(app, "/report?season=summer").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predictor_failure_is_a_server_error() {
    let health_registry = HealthRegistry::new();
    let state = Arc::new(AppState {
        context: test_context(Arc::new(FailingPredictor)),
        health_registry,
        metrics: ServiceMetrics::new(),
        logger: StructuredLogger::new("reorder-server-test"),
    });
    let app = create_test_router(state);

    let (status, body) = get_response(app, "/report?season=Summer").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("prediction"));
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_response(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);

    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["dataset"].is_object());
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_unhealthy(components::PREDICTOR, "model artifact unreadable")
        .await;

    let (status, body) = get_response(app, "/healthz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_flips_after_initialization() {
    let (app, state) = setup_test_app().await;

    let (status, _body) = get_response(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    state.health_registry.set_ready(true).await;

    let (status, body) = get_response(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    let readiness: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, state) = setup_test_app().await;

    state.metrics.observe_report_latency(0.002);
    state.metrics.set_records_loaded(3);
    state.metrics.set_model_artifact("demand_model_test.onnx");

    let (status, body) = get_response(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("reorder_service_report_latency_seconds"));
    assert!(text.contains("reorder_service_records_loaded"));
    assert!(text.contains("reorder_service_model_info"));
}
