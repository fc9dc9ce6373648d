//! Config command - View and validate dropsync configuration
//!
//! Provides the `dropsync config` CLI command which:
//! 1. Shows the effective configuration (file + environment), secrets redacted
//! 2. Validates it and reports every problem
//! 3. Prints the default configuration file path

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use dropsync_core::config::Config;

use super::LoadedConfig;
use crate::output::{get_formatter, plural, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the effective configuration
    Validate,
    /// Print the default configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(loaded, format),
            ConfigCommand::Validate => execute_validate(loaded, format),
            ConfigCommand::Path => execute_path(format),
        }
    }
}

fn execute_show(loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = loaded.config.redacted();

    info!(config_path = %loaded.path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
        return Ok(());
    }

    if loaded.from_file {
        formatter.success(&format!("Configuration ({})", loaded.path.display()));
    } else {
        formatter.success("Configuration (defaults, no file found)");
    }
    formatter.info("");
    let yaml =
        serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
    for line in yaml.lines() {
        formatter.info(line);
    }
    Ok(())
}

fn execute_validate(loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let errors = loaded.config.validate();

    info!(config_path = %loaded.path.display(), errors = errors.len(), "Validated configuration");

    if format.is_json() {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": loaded.path.display().to_string(),
            "from_file": loaded.from_file,
            "errors": messages,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", loaded.path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {}:",
            plural(errors.len(), "error")
        ));
        formatter.info(&format!("File: {}", loaded.path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    if !errors.is_empty() {
        bail!("Invalid configuration");
    }
    Ok(())
}

fn execute_path(format: OutputFormat) -> Result<()> {
    let path = Config::default_path();
    if format.is_json() {
        get_formatter(format).print_json(&serde_json::json!({
            "config_path": path.display().to_string(),
        }));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
