//! Per-file record upload
//!
//! ## Upload flow
//!
//! 1. **Duplicate check**: look up the file's remote path in the table.
//!    A failed lookup counts as "not found".
//! 2. **Link**: resolve a temporary media link. A failed resolution leaves
//!    the media fields out of the record.
//! 3. **Create**: build the [`SyncRecord`] and submit it. Rate limiting and
//!    transient failures are retried by the table adapter.
//! 4. **Pace**: sleep briefly after each successful create.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use dropsync_core::domain::{RemoteEntry, SyncRecord};
use dropsync_core::ports::{CreatedRecord, IRecordTable, IRemoteStore};

/// Default pause after every created record
pub const DEFAULT_POST_CREATE_DELAY: Duration = Duration::from_millis(200);

// ============================================================================
// LinkResolver
// ============================================================================

/// Resolves temporary media links, returning `None` on any failure
pub struct LinkResolver {
    store: Arc<dyn IRemoteStore>,
}

impl LinkResolver {
    pub fn new(store: Arc<dyn IRemoteStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, path: &str) -> Option<String> {
        match self.store.get_temporary_link(path).await {
            Ok(link) => Some(link),
            Err(e) => {
                warn!(path, error = %format!("{e:#}"), "Could not resolve media link");
                None
            }
        }
    }
}

// ============================================================================
// DuplicateChecker
// ============================================================================

/// Checks whether a record already exists for a remote path
///
/// Lookup failures are logged and reported as "does not exist", so a table
/// outage can lead to duplicate rows but never blocks the sync.
pub struct DuplicateChecker {
    table: Arc<dyn IRecordTable>,
}

impl DuplicateChecker {
    pub fn new(table: Arc<dyn IRecordTable>) -> Self {
        Self { table }
    }

    pub async fn exists(&self, remote_path: &str) -> bool {
        match self.table.find_by_remote_path(remote_path).await {
            Ok(Some(id)) => {
                debug!(path = remote_path, record_id = %id, "Existing record found");
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(
                    path = remote_path,
                    error = %format!("{e:#}"),
                    "Duplicate check failed, assuming no record exists"
                );
                false
            }
        }
    }
}

// ============================================================================
// RecordUploader
// ============================================================================

/// Result of uploading a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A new row was created
    Created(CreatedRecord),
    /// A row for the same remote path already existed
    SkippedDuplicate,
    /// Dry run: the record that would have been created
    WouldCreate(SyncRecord),
}

/// Creates one table row per remote file
pub struct RecordUploader {
    table: Arc<dyn IRecordTable>,
    links: LinkResolver,
    duplicates: DuplicateChecker,
    post_create_delay: Duration,
    dry_run: bool,
}

impl RecordUploader {
    pub fn new(store: Arc<dyn IRemoteStore>, table: Arc<dyn IRecordTable>) -> Self {
        Self {
            links: LinkResolver::new(store),
            duplicates: DuplicateChecker::new(Arc::clone(&table)),
            table,
            post_create_delay: DEFAULT_POST_CREATE_DELAY,
            dry_run: false,
        }
    }

    pub fn with_post_create_delay(mut self, delay: Duration) -> Self {
        self.post_create_delay = delay;
        self
    }

    /// In dry-run mode no links are resolved and nothing is written
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Uploads `entry` with the given category
    ///
    /// # Errors
    /// Returns an error if `entry` is not a file, `category` is empty, or
    /// the table rejected the record after all retries.
    pub async fn upload(&self, entry: &RemoteEntry, category: &str) -> Result<UploadOutcome> {
        let path = entry.path_lower();

        if self.duplicates.exists(path).await {
            info!(path, "Skipping file, record already exists");
            return Ok(UploadOutcome::SkippedDuplicate);
        }

        if self.dry_run {
            let record = SyncRecord::from_entry(entry, category, None)?;
            info!(path, category, file_type = %record.file_type, "Would create record");
            return Ok(UploadOutcome::WouldCreate(record));
        }

        let link = self.links.resolve(path).await;
        let record = SyncRecord::from_entry(entry, category, link)?;

        let created = self
            .table
            .create_record(&record)
            .await
            .with_context(|| format!("Upload of '{}' failed", entry.path_display()))?;

        info!(
            path,
            category,
            record_id = %created.id,
            has_link = record.media_link.is_some(),
            "Record created"
        );

        if !self.post_create_delay.is_zero() {
            tokio::time::sleep(self.post_create_delay).await;
        }

        Ok(UploadOutcome::Created(created))
    }
}
