//! Sync orchestrator - walks top-level folders and uploads every file
//!
//! ## Sync cycle
//!
//! 1. List the configured root (non-recursive). Failure aborts the run.
//! 2. For each top-level folder, in listing order:
//!    a. list all descendants (recursive);
//!    b. upload every file with the folder's name as category.
//! 3. Loose files directly under the root are ignored.
//!
//! Failures of single files or whole folders are recorded in the
//! [`SyncSummary`] and never abort the remaining work.
//! [`SyncOrchestrator::run_checked`] pings the table before step 1 and
//! aborts if it is unreachable.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use dropsync_core::config::Config;
use dropsync_core::domain::RemoteEntry;
use dropsync_core::ports::{IRecordTable, IRemoteStore};

use crate::uploader::{RecordUploader, UploadOutcome};

// ============================================================================
// Options
// ============================================================================

/// Run-time options for a [`SyncOrchestrator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Remote folder whose children are the categories; `""` is the root
    pub root_path: String,
    /// List and check for duplicates, but write nothing
    pub dry_run: bool,
    /// Pause after every created record
    pub post_create_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            root_path: String::new(),
            dry_run: false,
            post_create_delay: crate::uploader::DEFAULT_POST_CREATE_DELAY,
        }
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            root_path: config.dropbox.listing_root().to_string(),
            dry_run: false,
            post_create_delay: Duration::from_millis(config.sync.post_create_delay_ms),
        }
    }
}

// ============================================================================
// Outcomes and summary
// ============================================================================

/// Final state of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Created { record_id: String },
    SkippedDuplicate,
    WouldCreate,
    Failed { error: String },
}

/// Outcome of one file handed to the uploader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub category: String,
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// A top-level folder whose listing failed outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderFailure {
    pub folder: String,
    pub error: String,
}

/// Result of a sync run
///
/// Counts are derived from the recorded outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// One entry per file handed to the uploader, in walk order
    pub files: Vec<FileOutcome>,
    /// Folders that could not be listed at all
    pub folder_failures: Vec<FolderFailure>,
    /// Folders whose listing was truncated by a failed continuation page
    pub incomplete_folders: Vec<String>,
    /// Loose files directly under the root (never synced)
    pub ignored_root_files: usize,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl SyncSummary {
    /// Files handed to the uploader
    pub fn attempted(&self) -> usize {
        self.files.len()
    }

    /// Files for which a new record was created
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Created { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::SkippedDuplicate))
    }

    pub fn would_create(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::WouldCreate))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// True when every file and folder was processed without error
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.folder_failures.is_empty() && self.incomplete_folders.is_empty()
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

// ============================================================================
// SyncOrchestrator
// ============================================================================

/// Drives a complete sync pass from the remote store into the table
pub struct SyncOrchestrator {
    store: Arc<dyn IRemoteStore>,
    table: Arc<dyn IRecordTable>,
    uploader: RecordUploader,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn IRemoteStore>,
        table: Arc<dyn IRecordTable>,
        options: SyncOptions,
    ) -> Self {
        let uploader = RecordUploader::new(Arc::clone(&store), Arc::clone(&table))
            .with_post_create_delay(options.post_create_delay)
            .with_dry_run(options.dry_run);
        Self {
            store,
            table,
            uploader,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Pings the table, then runs one sync pass
    ///
    /// # Errors
    /// Returns an error without touching the remote store if the table is
    /// unreachable, or if the root listing fails.
    pub async fn run_checked(&self) -> Result<SyncSummary> {
        self.table
            .ping()
            .await
            .context("Connectivity check failed, nothing was synced")?;
        self.run().await
    }

    /// Runs one sync pass
    ///
    /// # Errors
    /// Returns an error only if the root listing fails. Everything after
    /// that is recorded in the summary.
    #[tracing::instrument(skip(self), fields(root = %self.options.root_path, dry_run = self.options.dry_run))]
    pub async fn run(&self) -> Result<SyncSummary> {
        let start = std::time::Instant::now();
        let mut summary = SyncSummary {
            dry_run: self.options.dry_run,
            ..SyncSummary::default()
        };

        let root = &self.options.root_path;
        let listing = self
            .store
            .list_folder(root, false)
            .await
            .with_context(|| format!("Failed to list root folder '{root}'"))?;

        if !listing.complete {
            warn!(root = %root, "Root listing is incomplete, some folders may be missing");
        }

        summary.ignored_root_files = listing.files().count();
        if summary.ignored_root_files > 0 {
            info!(
                count = summary.ignored_root_files,
                "Ignoring loose files at the root"
            );
        }

        let folders: Vec<&RemoteEntry> = listing.folders().collect();
        info!(folders = folders.len(), "Starting sync");

        for folder in folders {
            self.sync_folder(folder, &mut summary).await;
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            attempted = summary.attempted(),
            succeeded = summary.succeeded(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            folder_failures = summary.folder_failures.len(),
            incomplete_folders = summary.incomplete_folders.len(),
            duration_ms = summary.duration_ms,
            "Sync complete"
        );

        Ok(summary)
    }

    /// Uploads every file below one top-level folder
    async fn sync_folder(&self, folder: &RemoteEntry, summary: &mut SyncSummary) {
        let category = folder.name();
        info!(category, path = %folder.path_display(), "Syncing folder");

        let listing = match self.store.list_folder(folder.path_lower(), true).await {
            Ok(listing) => listing,
            Err(e) => {
                let error = format!("{e:#}");
                error!(category, error = %error, "Folder listing failed, skipping folder");
                summary.folder_failures.push(FolderFailure {
                    folder: category.to_string(),
                    error,
                });
                return;
            }
        };

        if !listing.complete {
            warn!(
                category,
                files = listing.files().count(),
                "Folder listing is incomplete, syncing the entries received"
            );
            summary.incomplete_folders.push(category.to_string());
        }

        for file in listing.files() {
            let status = match self.uploader.upload(file, category).await {
                Ok(UploadOutcome::Created(created)) => FileStatus::Created {
                    record_id: created.id,
                },
                Ok(UploadOutcome::SkippedDuplicate) => FileStatus::SkippedDuplicate,
                Ok(UploadOutcome::WouldCreate(_)) => FileStatus::WouldCreate,
                Err(e) => {
                    let error = format!("{e:#}");
                    error!(category, path = %file.path_display(), error = %error, "Upload failed");
                    FileStatus::Failed { error }
                }
            };

            summary.files.push(FileOutcome {
                category: category.to_string(),
                path: file.path_display().to_string(),
                status,
            });
        }
    }
}
