//! dropsync CLI - Mirror Dropbox folders into an Airtable table
//!
//! Provides commands for:
//! - Running a sync pass (optionally as a dry run)
//! - Checking connectivity to both services
//! - Inspecting and validating the configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{check::CheckCommand, config::ConfigCommand, sync::SyncCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "dropsync",
    version,
    about = "Mirror Dropbox folders into an Airtable table"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create table records for every file below the top-level folders
    Sync(SyncCommand),
    /// Verify credentials and connectivity for both services
    Check(CheckCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = commands::load_config(cli.config.as_deref())?;
    init_tracing(cli.verbose, cli.log_json, &loaded.config.logging.level);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(&loaded, format).await,
        Commands::Check(cmd) => cmd.execute(&loaded, format).await,
        Commands::Config(cmd) => cmd.execute(&loaded, format).await,
    }
}

/// Installs the global subscriber
///
/// `RUST_LOG` wins over `-v`, which wins over `logging.level`.
fn init_tracing(verbose: u8, json: bool, configured_level: &str) {
    let level = match verbose {
        0 => configured_level,
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
