//! Configuration module for dropsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! an environment overlay for credentials, validation, defaults, and a builder
//! for programmatic use.
//!
//! Configuration is read once at startup and passed explicitly into each
//! component. Nothing else in the workspace reads the process environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for dropsync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dropbox: DropboxConfig,
    pub airtable: AirtableConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Remote store (Dropbox) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropboxConfig {
    /// OAuth2 access token. Usually supplied through `DROPBOX_TOKEN`.
    pub access_token: Option<String>,
    /// Folder whose sub-folders are synced. Empty string is the root.
    pub root_path: String,
    /// Base URL of the RPC API.
    pub api_base_url: String,
    /// Ask the listing API to include media info for photos and videos.
    pub include_media_info: bool,
}

/// Destination table (Airtable) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirtableConfig {
    /// Personal access token. Usually supplied through `AIRTABLE_TOKEN`.
    pub api_key: Option<String>,
    /// Base identifier (`app...`). Usually supplied through `AIRTABLE_BASE_ID`.
    pub base_id: Option<String>,
    /// Table name or id. Usually supplied through `AIRTABLE_TABLE_NAME`.
    pub table_name: Option<String>,
    /// Base URL of the REST API.
    pub api_base_url: String,
    /// Column names used when writing records.
    pub fields: FieldNames,
}

/// Column names of the destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub file_name: String,
    pub remote_path: String,
    pub file_type: String,
    pub category: String,
    pub date_created: String,
    pub media_link: String,
    /// Optional attachment column that receives the resolved link.
    pub media_attachment: Option<String>,
    /// Optional column that receives `Image`, `Video` or `Other`.
    pub media_kind: Option<String>,
}

/// Retry, pacing and timeout settings shared by both services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Attempts per call, first try included.
    pub max_attempts: u32,
    /// Base of the exponential backoff after a 429 (milliseconds).
    pub base_backoff_ms: u64,
    /// Flat delay after any other failed attempt (milliseconds).
    pub transport_retry_delay_ms: u64,
    /// Pause after each created record (milliseconds).
    pub post_create_delay_ms: u64,
    /// Per-request timeout (seconds).
    pub request_timeout_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default Dropbox RPC endpoint.
pub const DEFAULT_DROPBOX_API_URL: &str = "https://api.dropboxapi.com/2";

/// Default Airtable REST endpoint.
pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

impl Default for DropboxConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            root_path: String::new(),
            api_base_url: DEFAULT_DROPBOX_API_URL.to_string(),
            include_media_info: false,
        }
    }
}

impl DropboxConfig {
    /// Root folder in the form the listing API expects (`""` for the root).
    pub fn listing_root(&self) -> &str {
        if self.root_path == "/" {
            ""
        } else {
            &self.root_path
        }
    }
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_id: None,
            table_name: None,
            api_base_url: DEFAULT_AIRTABLE_API_URL.to_string(),
            fields: FieldNames::default(),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            file_name: "FileName".to_string(),
            remote_path: "RemotePath".to_string(),
            file_type: "FileType".to_string(),
            category: "Category".to_string(),
            date_created: "DateCreated".to_string(),
            media_link: "MediaLink".to_string(),
            media_attachment: None,
            media_kind: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 1000,
            transport_retry_delay_ms: 1000,
            post_create_delay_ms: 200,
            request_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Environment variable holding the Dropbox access token.
pub const ENV_DROPBOX_TOKEN: &str = "DROPBOX_TOKEN";
/// Environment variable holding the Airtable token.
pub const ENV_AIRTABLE_TOKEN: &str = "AIRTABLE_TOKEN";
/// Environment variable holding the Airtable base id.
pub const ENV_AIRTABLE_BASE_ID: &str = "AIRTABLE_BASE_ID";
/// Environment variable holding the Airtable table name.
pub const ENV_AIRTABLE_TABLE_NAME: &str = "AIRTABLE_TABLE_NAME";
/// Optional environment variable overriding the remote root folder.
pub const ENV_DROPBOX_ROOT: &str = "DROPBOX_ROOT";

const REDACTED: &str = "********";

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/dropsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("dropsync")
            .join("config.yaml")
    }

    /// Overlay credentials and the root folder from an environment lookup.
    ///
    /// Values found through `lookup` replace whatever the file provided;
    /// empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_DROPBOX_TOKEN) {
            self.dropbox.access_token = Some(v);
        }
        if let Some(v) = get(ENV_AIRTABLE_TOKEN) {
            self.airtable.api_key = Some(v);
        }
        if let Some(v) = get(ENV_AIRTABLE_BASE_ID) {
            self.airtable.base_id = Some(v);
        }
        if let Some(v) = get(ENV_AIRTABLE_TABLE_NAME) {
            self.airtable.table_name = Some(v);
        }
        if let Some(v) = get(ENV_DROPBOX_ROOT) {
            self.dropbox.root_path = v;
        }
    }

    /// Overlay values from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// A copy with every secret replaced, suitable for printing.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.dropbox.access_token.is_some() {
            copy.dropbox.access_token = Some(REDACTED.to_string());
        }
        if copy.airtable.api_key.is_some() {
            copy.airtable.api_key = Some(REDACTED.to_string());
        }
        copy
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"airtable.base_id"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ValidationError {
                field: field.into(),
                message,
            });
        };

        // --- credentials ---
        if missing(&self.dropbox.access_token) {
            push(
                "dropbox.access_token",
                format!("required (set {ENV_DROPBOX_TOKEN})"),
            );
        }
        if missing(&self.airtable.api_key) {
            push(
                "airtable.api_key",
                format!("required (set {ENV_AIRTABLE_TOKEN})"),
            );
        }
        if missing(&self.airtable.base_id) {
            push(
                "airtable.base_id",
                format!("required (set {ENV_AIRTABLE_BASE_ID})"),
            );
        }
        if missing(&self.airtable.table_name) {
            push(
                "airtable.table_name",
                format!("required (set {ENV_AIRTABLE_TABLE_NAME})"),
            );
        }

        // --- dropbox ---
        let root = &self.dropbox.root_path;
        if !root.is_empty() && root != "/" && (!root.starts_with('/') || root.ends_with('/')) {
            push(
                "dropbox.root_path",
                format!("must be empty, '/', or start with '/' without a trailing '/': {root}"),
            );
        }
        if self.dropbox.api_base_url.trim().is_empty() {
            push("dropbox.api_base_url", "must not be empty".into());
        }

        // --- airtable ---
        if self.airtable.api_base_url.trim().is_empty() {
            push("airtable.api_base_url", "must not be empty".into());
        }
        let fields = &self.airtable.fields;
        for (name, value) in [
            ("file_name", &fields.file_name),
            ("remote_path", &fields.remote_path),
            ("file_type", &fields.file_type),
            ("category", &fields.category),
            ("date_created", &fields.date_created),
            ("media_link", &fields.media_link),
        ] {
            if value.trim().is_empty() {
                push(
                    &format!("airtable.fields.{name}"),
                    "must not be empty".into(),
                );
            }
        }

        // --- sync ---
        if self.sync.max_attempts == 0 {
            push("sync.max_attempts", "must be greater than 0".into());
        }
        if self.sync.request_timeout_secs == 0 {
            push("sync.request_timeout_secs", "must be greater than 0".into());
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            push(
                "logging.level",
                format!(
                    "invalid level '{}'; expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            );
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Config`].
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // -- dropbox --

    pub fn dropbox_access_token(mut self, token: impl Into<String>) -> Self {
        self.config.dropbox.access_token = Some(token.into());
        self
    }

    pub fn dropbox_root_path(mut self, root: impl Into<String>) -> Self {
        self.config.dropbox.root_path = root.into();
        self
    }

    pub fn dropbox_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.dropbox.api_base_url = url.into();
        self
    }

    // -- airtable --

    pub fn airtable_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.airtable.api_key = Some(key.into());
        self
    }

    pub fn airtable_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.config.airtable.base_id = Some(base_id.into());
        self
    }

    pub fn airtable_table_name(mut self, table: impl Into<String>) -> Self {
        self.config.airtable.table_name = Some(table.into());
        self
    }

    pub fn airtable_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.airtable.api_base_url = url.into();
        self
    }

    pub fn airtable_fields(mut self, fields: FieldNames) -> Self {
        self.config.airtable.fields = fields;
        self
    }

    // -- sync --

    pub fn sync_max_attempts(mut self, n: u32) -> Self {
        self.config.sync.max_attempts = n;
        self
    }

    pub fn sync_base_backoff_ms(mut self, ms: u64) -> Self {
        self.config.sync.base_backoff_ms = ms;
        self
    }

    pub fn sync_transport_retry_delay_ms(mut self, ms: u64) -> Self {
        self.config.sync.transport_retry_delay_ms = ms;
        self
    }

    pub fn sync_post_create_delay_ms(mut self, ms: u64) -> Self {
        self.config.sync.post_create_delay_ms = ms;
        self
    }

    // -- logging --

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Consume the builder and return the config **without** validation.
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the config or the list of
    /// validation errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
