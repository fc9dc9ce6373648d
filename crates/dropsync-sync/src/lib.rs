//! dropsync Sync - Folder walk and record upload engine
//!
//! Provides:
//! - Best-effort media link resolution and duplicate detection
//! - Per-file record upload with rate-limit pacing
//! - The top-level folder walk that assigns categories and collects a
//!   summary of explicit per-file and per-folder outcomes
//!
//! ## Modules
//!
//! - [`uploader`] - [`LinkResolver`](uploader::LinkResolver),
//!   [`DuplicateChecker`](uploader::DuplicateChecker) and
//!   [`RecordUploader`](uploader::RecordUploader)
//! - [`engine`] - [`SyncOrchestrator`](engine::SyncOrchestrator) and the
//!   run summary

pub mod engine;
pub mod uploader;
