//! Service health command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, HealthResponse};
use crate::output::{color_status, OutputFormat};

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Fetch and render service health
pub async fn run(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthResponse = client.get("healthz").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        OutputFormat::Table => {
            println!("Service status: {}", color_status(&health.status));

            let mut rows: Vec<ComponentRow> = health
                .components
                .into_iter()
                .map(|(component, detail)| ComponentRow {
                    component,
                    status: color_status(&detail.status),
                    message: detail.message.unwrap_or_default(),
                })
                .collect();
            rows.sort_by(|a, b| a.component.cmp(&b.component));

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
