//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Reorder service configuration, sourced from `REORDER_`-prefixed
/// environment variables with per-field defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// API server port for the report/health/metrics endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Clinic medicines dataset (CSV)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Fitted demand regression artifact (ONNX)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Fitted medicine-name vocabulary (JSON array of labels)
    #[serde(default = "default_name_vocab_path")]
    pub name_vocab_path: String,

    /// Fitted season vocabulary (JSON array of labels)
    #[serde(default = "default_season_vocab_path")]
    pub season_vocab_path: String,
}

fn default_api_port() -> u16 {
    8080
}

fn default_dataset_path() -> String {
    "rural_clinic_medicines_dataset_updated.csv".to_string()
}

fn default_model_path() -> String {
    "medicine_demand_model.onnx".to_string()
}

fn default_name_vocab_path() -> String {
    "le_name.json".to_string()
}

fn default_season_vocab_path() -> String {
    "le_season.json".to_string()
}

impl ServiceConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("REORDER"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            api_port: default_api_port(),
            dataset_path: default_dataset_path(),
            model_path: default_model_path(),
            name_vocab_path: default_name_vocab_path(),
            season_vocab_path: default_season_vocab_path(),
        }))
    }
}
