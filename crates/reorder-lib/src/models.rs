//! Core data models for the reorder service

use crate::season::Season;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cleaned row of the clinic medicines dataset
///
/// String fields are trimmed at load time. Dates that fail to parse are
/// absent rather than an error; missing stock/quantity values default to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineRecord {
    pub name: String,
    pub manufacturer_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pack_size_label: String,
    pub location_id: String,
    pub category: String,
    /// Raw season label carried through from the source table.
    /// Report logic never reads it; classification uses `manufacture_date`.
    pub season: String,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub stock_remaining: f64,
    pub quantity: f64,
}

/// A dataset record with its derived season and cached integer encodings
///
/// Built once at context construction and immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct EncodedRecord {
    pub record: MedicineRecord,
    pub calculated_season: Season,
    pub name_enc: i64,
    pub season_enc: i64,
}

/// One line of a reorder report, produced per request
///
/// Field names and order match the response interface exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderEntry {
    #[serde(rename = "Medicine")]
    pub medicine: String,
    #[serde(rename = "Predicted_Demand")]
    pub predicted_demand: i64,
    #[serde(rename = "Stock_Remaining")]
    pub stock_remaining: f64,
    #[serde(rename = "Reorder_Quantity")]
    pub reorder_quantity: i64,
}
