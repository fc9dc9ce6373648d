//! Sync command - Create table records for Dropbox files
//!
//! Provides the `dropsync sync` CLI command which:
//! 1. Validates the configuration (credentials, root path)
//! 2. Creates the Dropbox and Airtable adapters
//! 3. Runs the SyncOrchestrator, which checks table connectivity before
//!    walking any folder, and displays the summary

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::info;

use dropsync_sync::engine::{FileStatus, SyncOptions, SyncOrchestrator, SyncSummary};

use super::{build_adapters, ensure_valid, LoadedConfig};
use crate::output::{format_duration_ms, get_formatter, plural, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Show what would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Remote folder whose subfolders are synced (overrides the config)
    #[arg(long)]
    pub root: Option<String>,
}

impl SyncCommand {
    /// Wires up the adapters, runs one pass and prints the summary
    ///
    /// Individual file and folder failures are reported but do not make the
    /// command fail.
    pub async fn execute(&self, loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let mut config = loaded.config.clone();
        if let Some(root) = &self.root {
            config.dropbox.root_path = root.clone();
        }
        ensure_valid(&config)?;

        let (store, table) = build_adapters(&config)?;

        let options = SyncOptions {
            dry_run: self.dry_run,
            ..SyncOptions::from(&config)
        };
        info!(
            config_path = %loaded.path.display(),
            root = %options.root_path,
            dry_run = options.dry_run,
            "Starting sync"
        );
        if options.dry_run {
            formatter.info("Dry run mode - no records will be created");
        }

        formatter.info("Checking Airtable connectivity...");
        let summary = SyncOrchestrator::new(store, table, options)
            .run_checked()
            .await?;

        if format.is_json() {
            formatter.print_json(&summary_json(&summary)?);
            return Ok(());
        }

        let verb = if summary.dry_run { "Dry run" } else { "Sync" };
        formatter.success(&format!(
            "{verb} completed in {}",
            format_duration_ms(summary.duration_ms)
        ));
        for line in summary_lines(&summary) {
            formatter.info(&line);
        }
        for failure in &summary.folder_failures {
            formatter.warn(&format!(
                "Folder '{}' could not be listed: {}",
                failure.folder, failure.error
            ));
        }
        for folder in &summary.incomplete_folders {
            formatter.warn(&format!("Folder '{folder}' was only partially listed"));
        }
        for file in &summary.files {
            if let FileStatus::Failed { error } = &file.status {
                formatter.error(&format!("{}: {}", file.path, error));
            }
        }

        Ok(())
    }
}

/// Count lines for human output
fn summary_lines(summary: &SyncSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Attempted:  {}", plural(summary.attempted(), "file")),
        format!("Succeeded:  {}", plural(summary.succeeded(), "file")),
    ];
    if summary.skipped() > 0 {
        lines.push(format!(
            "Skipped:    {} (already in table)",
            plural(summary.skipped(), "file")
        ));
    }
    if summary.dry_run {
        lines.push(format!(
            "Would create: {}",
            plural(summary.would_create(), "record")
        ));
    }
    if summary.failed() > 0 {
        lines.push(format!("Failed:     {}", plural(summary.failed(), "file")));
    }
    if summary.ignored_root_files > 0 {
        lines.push(format!(
            "Ignored:    {} at the root",
            plural(summary.ignored_root_files, "loose file")
        ));
    }
    lines
}

/// The summary document for `--json`, with the derived counts added
fn summary_json(summary: &SyncSummary) -> Result<Value> {
    let mut json = serde_json::to_value(summary).context("Failed to serialize sync summary")?;
    if let Value::Object(map) = &mut json {
        map.insert("attempted".into(), summary.attempted().into());
        map.insert("succeeded".into(), summary.succeeded().into());
        map.insert("skipped".into(), summary.skipped().into());
        map.insert("would_create".into(), summary.would_create().into());
        map.insert("failed".into(), summary.failed().into());
    }
    Ok(json)
}
