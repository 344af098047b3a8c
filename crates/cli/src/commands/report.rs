//! Reorder report command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, ReorderEntry};
use crate::output::{print_success, OutputFormat};

/// Row for the reorder report table
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Medicine")]
    medicine: String,
    #[tabled(rename = "Predicted Demand")]
    predicted_demand: i64,
    #[tabled(rename = "Stock Remaining")]
    stock_remaining: f64,
    #[tabled(rename = "Reorder Qty")]
    reorder_quantity: i64,
}

impl From<ReorderEntry> for ReportRow {
    fn from(entry: ReorderEntry) -> Self {
        Self {
            medicine: entry.medicine,
            predicted_demand: entry.predicted_demand,
            stock_remaining: entry.stock_remaining,
            reorder_quantity: entry.reorder_quantity,
        }
    }
}

/// Fetch and render the reorder report for a season
pub async fn run(client: &ApiClient, season: &str, format: OutputFormat) -> Result<()> {
    let entries: Vec<ReorderEntry> = client.get(&format!("report?season={}", season)).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                print_success(&format!(
                    "Stock covers forecast demand for {}; nothing to reorder",
                    season
                ));
                return Ok(());
            }
            let rows: Vec<ReportRow> = entries.into_iter().map(ReportRow::from).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
