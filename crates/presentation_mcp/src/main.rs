//! wttr-mcp
//!
//! MCP server for wttr.in weather, or a one-shot query from the shell.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use integration_wttr::{Locale, UnitSystem, WttrClient};
use presentation_mcp::{AppConfig, TOOL_NAME, WeatherToolHandler, serve_stdio, telemetry};
use tracing::info;

/// wttr.in weather tool for MCP clients
#[derive(Parser)]
#[command(name = "wttr-mcp")]
#[command(author, version, about = "wttr.in weather tool for MCP clients", long_about = None)]
struct Cli {
    /// Verbosity level (logs go to stderr)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a configuration file
    #[arg(short, long, env = "WTTR_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Language code for weather descriptions (e.g. "de")
    #[arg(long)]
    locale: Option<String>,

    /// Unit system: "imperial" or anything else for metric
    #[arg(long)]
    unit: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP requests on stdin/stdout (default)
    Serve,

    /// Fetch the weather report for a location and print it
    ///
    /// Example: wttr-mcp query "New York"
    Query {
        /// City, airport code, landmark (~Eiffel Tower) or lat,lon
        location: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(code) = &cli.locale {
        config.weather.locale = Locale::from_code(code)?;
    }
    if let Some(unit) = &cli.unit {
        config.weather.unit = UnitSystem::resolve(unit);
    }

    telemetry::init_logging(&config.logging, cli.verbose)?;

    info!(
        locale = %config.weather.locale,
        unit = %config.weather.unit,
        base_url = %config.weather.base_url,
        "Configuration loaded"
    );

    let client = WttrClient::new(config.weather)?;
    let handler = WeatherToolHandler::new(Arc::new(client));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            serve_stdio(handler).await?;
        },
        Commands::Query { location } => {
            let report = handler
                .call_tool(TOOL_NAME, &serde_json::json!({ "location_name": location }))
                .await?;
            println!("{report}");
        },
    }

    Ok(())
}
