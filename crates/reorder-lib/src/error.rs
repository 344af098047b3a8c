//! Request-path error taxonomy for report generation

use thiserror::Error;

/// Errors surfaced while building a reorder report
///
/// Startup failures (unreadable dataset, missing artifacts) are plain
/// `anyhow` errors and fatal to process initialization; this enum covers
/// only the request path.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The requested season is not one of the four fixed labels
    #[error("invalid season '{0}': expected one of Summer, Monsoon, Autumn, Winter")]
    InvalidSeason(String),

    /// A dataset value is missing from its fitted vocabulary.
    ///
    /// Indicates stale encoder artifacts relative to the dataset, a fatal
    /// configuration mismatch rather than a per-request condition.
    #[error("value '{value}' is not in the fitted {vocabulary} vocabulary; encoder artifacts are stale relative to the dataset")]
    UnknownCategory { vocabulary: &'static str, value: String },

    /// The predictor failed to produce a demand estimate for an encoded pair
    #[error("demand prediction failed for encoded pair ({name_enc}, {season_enc}): {detail}")]
    PredictionUnavailable {
        name_enc: i64,
        season_enc: i64,
        detail: String,
    },
}

impl ReportError {
    /// Returns true for errors caused by the caller's input rather than
    /// server-side state
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReportError::InvalidSeason(_))
    }
}
