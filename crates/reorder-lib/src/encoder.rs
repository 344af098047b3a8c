//! Categorical encoding backed by externally fitted vocabularies
//!
//! The label encoders are fitted by the offline training pipeline and
//! exported as JSON arrays of class labels in fitted order; the integer
//! code of a label is its index. Vocabularies are loaded once at startup
//! and immutable thereafter.

use crate::error::ReportError;
use crate::season::Season;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Capability interface for turning categorical values into the integer
/// codes the demand model expects
///
/// Swappable so report tests can run against a deterministic stub instead
/// of the fitted artifacts.
pub trait CategoryEncoder: Send + Sync {
    fn encode_name(&self, name: &str) -> Result<i64, ReportError>;
    fn encode_season(&self, season: Season) -> Result<i64, ReportError>;
}

/// Production encoder over the two fitted vocabulary artifacts
pub struct FittedLabelEncoder {
    names: HashMap<String, i64>,
    seasons: HashMap<String, i64>,
}

impl FittedLabelEncoder {
    /// Build an encoder from in-memory class lists (fitted order)
    pub fn from_classes(name_classes: Vec<String>, season_classes: Vec<String>) -> Self {
        Self {
            names: index_classes(name_classes),
            seasons: index_classes(season_classes),
        }
    }

    /// Load both vocabulary artifacts from disk
    pub fn from_files(name_path: impl AsRef<Path>, season_path: impl AsRef<Path>) -> Result<Self> {
        let name_classes = load_classes(name_path.as_ref())?;
        let season_classes = load_classes(season_path.as_ref())?;
        debug!(
            names = name_classes.len(),
            seasons = season_classes.len(),
            "Encoder vocabularies loaded"
        );
        Ok(Self::from_classes(name_classes, season_classes))
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

impl CategoryEncoder for FittedLabelEncoder {
    fn encode_name(&self, name: &str) -> Result<i64, ReportError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| ReportError::UnknownCategory {
                vocabulary: "name",
                value: name.to_string(),
            })
    }

    fn encode_season(&self, season: Season) -> Result<i64, ReportError> {
        self.seasons
            .get(season.as_str())
            .copied()
            .ok_or_else(|| ReportError::UnknownCategory {
                vocabulary: "season",
                value: season.to_string(),
            })
    }
}

fn index_classes(classes: Vec<String>) -> HashMap<String, i64> {
    classes
        .into_iter()
        .enumerate()
        .map(|(code, label)| (label, code as i64))
        .collect()
}

fn load_classes(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("vocabulary '{}' is not a JSON array of labels", path.display()))
}
