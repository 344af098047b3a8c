//! Seasonal medicine reorder CLI
//!
//! A command-line tool for querying reorder reports and service health
//! from a running reorder server.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{report, status};

/// Seasonal medicine reorder CLI
#[derive(Parser)]
#[command(name = "reorder")]
#[command(author, version, about = "CLI for the seasonal medicine reorder service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via REORDER_API_URL env var)
    #[arg(long, env = "REORDER_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the reorder report for a season
    Report {
        /// Season label: Summer, Monsoon, Autumn or Winter (case-sensitive)
        #[arg(long)]
        season: String,
    },

    /// Show service health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Report { season } => report::run(&client, &season, cli.format).await,
        Commands::Status => status::run(&client, cli.format).await,
    }
}
