//! ONNX Runtime inference using tract
//!
//! Runs the externally fitted demand regression, exported to ONNX, via
//! tract-onnx. The model is loaded once at startup and never updated; the
//! plan is immutable, so concurrent requests run it without locking.

use super::DemandPredictor;
use crate::error::ReportError;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Number of input features expected by the model: (name_enc, season_enc)
const NUM_FEATURES: usize = 2;

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based demand predictor using tract for lightweight inference
pub struct OnnxDemandModel {
    model: TractModel,
}

impl OnnxDemandModel {
    /// Create a predictor from model bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            model: Self::load_model(model_bytes)?,
        })
    }

    /// Load the model artifact from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read model artifact '{}'", path.display()))?;
        Self::from_bytes(&bytes)
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    /// Convert an encoded pair to the model's input tensor
    fn pair_to_tensor(name_enc: i64, season_enc: i64) -> Tensor {
        let data = vec![name_enc as f32, season_enc as f32];
        tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), data)
            .unwrap()
            .into()
    }
}

impl DemandPredictor for OnnxDemandModel {
    fn predict(&self, name_enc: i64, season_enc: i64) -> Result<f64, ReportError> {
        let unavailable = |detail: String| ReportError::PredictionUnavailable {
            name_enc,
            season_enc,
            detail,
        };

        let start = Instant::now();
        let input = Self::pair_to_tensor(name_enc, season_enc);

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| unavailable(e.to_string()))?;
        let output = result
            .first()
            .ok_or_else(|| unavailable("model produced no output".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| unavailable(e.to_string()))?;
        let demand = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| unavailable("model output tensor is empty".to_string()))?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(f64::from(demand))
    }
}
