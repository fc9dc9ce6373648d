//! CLI subcommands and the wiring they share

pub mod check;
pub mod config;
pub mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::debug;

use dropsync_airtable::provider::AirtableRecordTable;
use dropsync_core::config::Config;
use dropsync_core::ports::{IRecordTable, IRemoteStore};
use dropsync_dropbox::provider::DropboxRemoteStore;

/// Effective configuration plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// False when no file existed and defaults were used
    pub from_file: bool,
}

/// Loads the configuration file and overlays the process environment
///
/// An explicit `--config` path must exist. The default path is optional.
/// A file that exists but cannot be parsed is always an error.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    let from_file = path.exists();
    if explicit.is_some() && !from_file {
        bail!("Configuration file not found: {}", path.display());
    }

    let mut config = if from_file {
        Config::load(&path)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))?
    } else {
        Config::default()
    };
    config.apply_process_env();

    Ok(LoadedConfig {
        config,
        path,
        from_file,
    })
}

/// Fails with every validation error when the configuration is unusable
pub fn ensure_valid(config: &Config) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    bail!("Invalid configuration: {}", details.join("; "))
}

/// Builds both service adapters from a validated configuration
pub fn build_adapters(config: &Config) -> Result<(Arc<dyn IRemoteStore>, Arc<dyn IRecordTable>)> {
    let store = DropboxRemoteStore::from_config(config)?;
    let table = AirtableRecordTable::from_config(config)?;
    debug!(
        dropbox = %config.dropbox.api_base_url,
        table = %table.client().table_url(),
        "Adapters ready"
    );
    let store: Arc<dyn IRemoteStore> = Arc::new(store);
    let table: Arc<dyn IRecordTable> = Arc::new(table);
    Ok((store, table))
}
