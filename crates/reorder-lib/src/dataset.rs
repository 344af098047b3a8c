//! CSV dataset ingestion and cleaning
//!
//! Loads the clinic medicines table once at startup. Header and field
//! whitespace is trimmed, dates parse day-first and degrade to absent on
//! failure, and missing stock/quantity values default to zero. A row that
//! is structurally unreadable fails the load; startup errors are fatal.

use crate::models::MedicineRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Date formats accepted for `manufacture_date` / `expiry_date`, day first
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Raw CSV row as it appears in the source table
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: String,
    manufacturer_name: String,
    #[serde(rename = "type")]
    kind: String,
    pack_size_label: String,
    location_id: String,
    category: String,
    season: String,
    manufacture_date: Option<String>,
    expiry_date: Option<String>,
    stock_remaining: Option<f64>,
    quantity: Option<f64>,
}

impl RawRecord {
    fn into_record(self) -> MedicineRecord {
        MedicineRecord {
            name: self.name,
            manufacturer_name: self.manufacturer_name,
            kind: self.kind,
            pack_size_label: self.pack_size_label,
            location_id: self.location_id,
            category: self.category,
            season: self.season,
            manufacture_date: self.manufacture_date.as_deref().and_then(parse_dayfirst_date),
            expiry_date: self.expiry_date.as_deref().and_then(parse_dayfirst_date),
            stock_remaining: self.stock_remaining.unwrap_or(0.0),
            quantity: self.quantity.unwrap_or(0.0),
        }
    }
}

/// Parse a day-first date string, returning None rather than erroring
fn parse_dayfirst_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Load and clean medicine records from a CSV reader
pub fn load_records<R: Read>(reader: R) -> Result<Vec<MedicineRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize().enumerate() {
        // +2: one for the header row, one for 1-based line numbers
        let raw: RawRecord = row.with_context(|| format!("dataset row {} unreadable", index + 2))?;
        records.push(raw.into_record());
    }

    debug!(records = records.len(), "Dataset loaded");
    Ok(records)
}

/// Load medicine records from a CSV file on disk
pub fn load_records_from_path(path: impl AsRef<Path>) -> Result<Vec<MedicineRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open dataset '{}'", path.display()))?;
    load_records(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
 name ,manufacturer_name,type,pack_size_label,location_id,category,season,manufacture_date,expiry_date,stock_remaining,quantity
 ParacetamolX , Acme Labs ,tablet,strip of 10,LOC-01,analgesic,summer,10-04-2023,10-04-2025,5,150
Coughrelief,Acme Labs,syrup,bottle of 100 ml,LOC-02,respiratory,winter,not-a-date,01/12/2024,,40
Vitamaxin,Brightline,capsule,strip of 15,LOC-01,supplement,monsoon,05/08/2023,,12.5,
";

    #[test]
    fn trims_headers_and_fields() {
        let records = load_records(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "ParacetamolX");
        assert_eq!(records[0].manufacturer_name, "Acme Labs");
    }

    #[test]
    fn parses_dayfirst_dates() {
        let records = load_records(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(
            records[0].manufacture_date,
            Some(NaiveDate::from_ymd_opt(2023, 4, 10).unwrap())
        );
        assert_eq!(
            records[2].manufacture_date,
            Some(NaiveDate::from_ymd_opt(2023, 8, 5).unwrap())
        );
    }

    #[test]
    fn unparseable_dates_become_absent_not_errors() {
        let records = load_records(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records[1].manufacture_date, None);
        assert_eq!(
            records[1].expiry_date,
            Some(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
        );
        assert_eq!(records[2].expiry_date, None);
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let records = load_records(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records[1].stock_remaining, 0.0);
        assert_eq!(records[1].quantity, 40.0);
        assert_eq!(records[2].stock_remaining, 12.5);
        assert_eq!(records[2].quantity, 0.0);
    }

    #[test]
    fn raw_season_column_is_carried_through() {
        let records = load_records(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records[0].season, "summer");
    }

    #[test]
    fn structurally_broken_row_fails_the_load() {
        let csv = "\
name,manufacturer_name,type,pack_size_label,location_id,category,season,manufacture_date,expiry_date,stock_remaining,quantity
OnlyAName
";
        assert!(load_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_records_from_path("/nonexistent/medicines.csv").is_err());
    }
}
