//! Check command - Verify both services are reachable
//!
//! Lists the configured Dropbox root and reads one Airtable record. Exits
//! with an error if either call fails.

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use super::{build_adapters, ensure_valid, LoadedConfig};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(&self, loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let config = &loaded.config;
        ensure_valid(config)?;

        let (store, table) = build_adapters(config)?;
        let root = config.dropbox.listing_root();

        info!(root = %root, "Checking Dropbox");
        let dropbox = store
            .list_folder(root, false)
            .await
            .map(|listing| listing.folders().count());

        info!("Checking Airtable");
        let airtable = table.ping().await;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "dropbox": {
                    "ok": dropbox.is_ok(),
                    "folders": dropbox.as_ref().ok(),
                    "error": dropbox.as_ref().err().map(|e| format!("{e:#}")),
                },
                "airtable": {
                    "ok": airtable.is_ok(),
                    "error": airtable.as_ref().err().map(|e| format!("{e:#}")),
                },
            }));
        } else {
            match &dropbox {
                Ok(folders) => formatter.success(&format!(
                    "Dropbox reachable ({folders} top-level folder{})",
                    if *folders == 1 { "" } else { "s" }
                )),
                Err(e) => formatter.error(&format!("Dropbox: {e:#}")),
            }
            match &airtable {
                Ok(()) => formatter.success("Airtable table reachable"),
                Err(e) => formatter.error(&format!("Airtable: {e:#}")),
            }
        }

        if dropbox.is_err() || airtable.is_err() {
            bail!("Connectivity check failed");
        }
        Ok(())
    }
}
