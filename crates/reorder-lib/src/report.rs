//! Reorder report building
//!
//! Orchestrates the season taxonomy, the fitted encoder, and the demand
//! model into the stock-shortfall report. The context is constructed once
//! at startup from the loaded dataset and artifacts and shared read-only
//! across requests; report generation is a pure function of the requested
//! season and that snapshot.

use crate::encoder::CategoryEncoder;
use crate::error::ReportError;
use crate::models::{EncodedRecord, MedicineRecord, ReorderEntry};
use crate::predictor::DemandPredictor;
use crate::season::Season;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable report-building context: encoded records plus the fitted
/// encoder and predictor collaborators
pub struct ReportContext {
    records: Vec<EncodedRecord>,
    encoder: Arc<dyn CategoryEncoder>,
    predictor: Arc<dyn DemandPredictor>,
}

impl std::fmt::Debug for ReportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportContext")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl ReportContext {
    /// Encode the dataset once and capture the collaborators.
    ///
    /// Records without a parseable manufacture date have no derivable
    /// season; they are excluded from every season bucket here rather than
    /// assigned a fallback label. A dataset value missing from its fitted
    /// vocabulary fails construction: the artifacts are stale and the
    /// process must not come up half-configured.
    pub fn new(
        records: Vec<MedicineRecord>,
        encoder: Arc<dyn CategoryEncoder>,
        predictor: Arc<dyn DemandPredictor>,
    ) -> Result<Self, ReportError> {
        let mut encoded = Vec::with_capacity(records.len());
        let mut unclassified = 0usize;
        for record in records {
            let Some(date) = record.manufacture_date else {
                unclassified += 1;
                continue;
            };
            let calculated_season = Season::classify(date);
            let name_enc = encoder.encode_name(&record.name)?;
            let season_enc = encoder.encode_season(calculated_season)?;
            encoded.push(EncodedRecord {
                record,
                calculated_season,
                name_enc,
                season_enc,
            });
        }
        if unclassified > 0 {
            warn!(
                skipped = unclassified,
                "Records without a parseable manufacture date are excluded from every season bucket"
            );
        }
        debug!(records = encoded.len(), "Report context ready");
        Ok(Self {
            records: encoded,
            encoder,
            predictor,
        })
    }

    /// Number of season-classified records held by this context
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Parse a raw season label and build its report.
    ///
    /// The label must be exactly one of the four canonical season names;
    /// anything else fails with `InvalidSeason` and no report is produced.
    pub fn build_report_for_label(&self, label: &str) -> Result<Vec<ReorderEntry>, ReportError> {
        self.build_report(label.parse()?)
    }

    /// Build the reorder report for a season: filter the cached records,
    /// forecast demand per record, keep the ones whose stock falls short,
    /// and sort by shortfall, most urgent first.
    pub fn build_report(&self, season: Season) -> Result<Vec<ReorderEntry>, ReportError> {
        let season_enc = self.encoder.encode_season(season)?;

        let mut entries = self
            .records
            .iter()
            .filter(|candidate| candidate.calculated_season == season)
            .map(|candidate| self.evaluate(candidate, season_enc))
            .filter_map(|candidate| candidate.transpose())
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps ties deterministic across identical calls
        entries.sort_by(|a, b| b.reorder_quantity.cmp(&a.reorder_quantity));
        Ok(entries)
    }

    /// Evaluate one candidate: `None` when current stock already covers the
    /// forecast demand
    fn evaluate(
        &self,
        candidate: &EncodedRecord,
        season_enc: i64,
    ) -> Result<Option<ReorderEntry>, ReportError> {
        let demand = self.predictor.predict(candidate.name_enc, season_enc)?;
        let stock = candidate.record.stock_remaining;
        if stock >= demand {
            return Ok(None);
        }

        // Positive given the drop condition; floored at zero for
        // floating-point edge cases
        let shortfall = (demand - stock).max(0.0);
        Ok(Some(ReorderEntry {
            medicine: candidate.record.name.clone(),
            predicted_demand: demand.round() as i64,
            stock_remaining: stock,
            reorder_quantity: shortfall.round() as i64,
        }))
    }
}
