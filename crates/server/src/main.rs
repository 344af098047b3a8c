//! Reorder server - seasonal medicine reorder report service
//!
//! Loads the clinic dataset and the fitted encoder/model artifacts once at
//! startup, then serves the report API over HTTP.

use anyhow::{Context, Result};
use reorder_lib::{
    dataset,
    health::{components, HealthRegistry},
    FittedLabelEncoder, OnnxDemandModel, ReportContext, ServiceMetrics, StructuredLogger,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting reorder-server");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(
        dataset = %config.dataset_path,
        model = %config.model_path,
        "Service configured"
    );

    // Load the dataset and fitted artifacts; any failure here is fatal
    let records = dataset::load_records_from_path(&config.dataset_path)
        .context("failed to load the medicines dataset")?;
    let encoder = Arc::new(
        FittedLabelEncoder::from_files(&config.name_vocab_path, &config.season_vocab_path)
            .context("failed to load the fitted vocabularies")?,
    );
    let predictor = Arc::new(
        OnnxDemandModel::from_file(&config.model_path)
            .context("failed to load the demand model")?,
    );
    let context = Arc::new(
        ReportContext::new(records, encoder, predictor)
            .context("dataset does not match the fitted vocabularies")?,
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::DATASET).await;
    health_registry.register(components::ENCODER).await;
    health_registry.register(components::PREDICTOR).await;

    // Initialize metrics
    let metrics = ServiceMetrics::new();
    metrics.set_records_loaded(context.record_count() as i64);
    metrics.set_model_artifact(&config.model_path);

    // Initialize structured logger
    let logger = StructuredLogger::new("reorder-server");
    logger.log_startup(SERVICE_VERSION, context.record_count(), &config.model_path);

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        context,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark service as ready after the one-time load
    health_registry.set_ready(true).await;

    // Start the API server
    let _api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
