//! Demand prediction over the fitted regression artifact

mod inference;

pub use inference::OnnxDemandModel;

use crate::error::ReportError;

/// Trait for demand prediction implementations
///
/// The fitted model is an opaque deterministic function of the two integer
/// inputs plus fixed model state; report tests swap in a deterministic stub.
pub trait DemandPredictor: Send + Sync {
    /// Forecast demand for an encoded (medicine, season) pair
    fn predict(&self, name_enc: i64, season_enc: i64) -> Result<f64, ReportError>;
}
