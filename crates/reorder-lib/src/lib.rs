//! Core library for the seasonal medicine reorder service
//!
//! This crate provides:
//! - Season classification over the clinic dataset
//! - CSV dataset ingestion and cleaning
//! - Categorical encoding backed by fitted vocabulary artifacts
//! - Demand prediction over a fitted ONNX regression model
//! - Reorder report building
//! - Health checks and observability

pub mod dataset;
pub mod encoder;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod report;
pub mod season;

pub use encoder::{CategoryEncoder, FittedLabelEncoder};
pub use error::ReportError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{DemandPredictor, OnnxDemandModel};
pub use report::ReportContext;
pub use season::Season;
