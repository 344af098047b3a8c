//! Observability infrastructure for the reorder service
//!
//! Provides:
//! - Prometheus metrics (report latency, dataset size, request counters)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, GaugeVec,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    report_latency_seconds: Histogram,
    records_loaded: IntGauge,
    model_info: GaugeVec,
    reports_generated: IntCounter,
    report_errors: IntCounter,
    invalid_season_requests: IntCounter,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            report_latency_seconds: register_histogram!(
                "reorder_service_report_latency_seconds",
                "Time spent building a reorder report",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register report_latency_seconds"),

            records_loaded: register_int_gauge!(
                "reorder_service_records_loaded",
                "Number of season-classified dataset records held in memory"
            )
            .expect("Failed to register records_loaded"),

            model_info: register_gauge_vec!(
                "reorder_service_model_info",
                "Information about the currently loaded demand model",
                &["artifact"]
            )
            .expect("Failed to register model_info"),

            reports_generated: register_int_counter!(
                "reorder_service_reports_generated_total",
                "Total number of reorder reports generated"
            )
            .expect("Failed to register reports_generated_total"),

            report_errors: register_int_counter!(
                "reorder_service_report_errors_total",
                "Total number of report requests that failed server-side"
            )
            .expect("Failed to register report_errors_total"),

            invalid_season_requests: register_int_counter!(
                "reorder_service_invalid_season_requests_total",
                "Total number of report requests rejected for an invalid season"
            )
            .expect("Failed to register invalid_season_requests_total"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a report-building latency observation
    pub fn observe_report_latency(&self, duration_secs: f64) {
        self.inner().report_latency_seconds.observe(duration_secs);
    }

    /// Update the loaded-records gauge
    pub fn set_records_loaded(&self, count: i64) {
        self.inner().records_loaded.set(count);
    }

    /// Update model artifact info
    pub fn set_model_artifact(&self, artifact: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[artifact])
            .set(1.0);
    }

    /// Increment the generated-reports counter
    pub fn inc_reports_generated(&self) {
        self.inner().reports_generated.inc();
    }

    /// Increment the server-side error counter
    pub fn inc_report_errors(&self) {
        self.inner().report_errors.inc();
    }

    /// Increment the rejected-season counter
    pub fn inc_invalid_season_requests(&self) {
        self.inner().invalid_season_requests.inc();
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for startup, shutdown, and
/// report generation.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup with the loaded state
    pub fn log_startup(&self, version: &str, records_loaded: usize, model_artifact: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            service_version = %version,
            records_loaded = records_loaded,
            model_artifact = %model_artifact,
            "Reorder service started"
        );
    }

    /// Log a generated report
    pub fn log_report(&self, season: &str, entries: usize, elapsed_ms: u128) {
        info!(
            event = "report_generated",
            service = %self.service_name,
            season = %season,
            entries = entries,
            elapsed_ms = elapsed_ms,
            "Reorder report generated"
        );
    }

    /// Log a failed report request
    pub fn log_report_error(&self, season: &str, error: &str) {
        warn!(
            event = "report_failed",
            service = %self.service_name,
            season = %season,
            error = %error,
            "Reorder report failed"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Reorder service shutting down"
        );
    }
}
