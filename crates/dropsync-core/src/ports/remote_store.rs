//! Remote store port
//!
//! Interface for the cloud file-hosting provider the files are read from.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and the sync core only needs to log them.
//! - Implementations retry transient failures internally according to
//!   their [`RetryPolicy`](crate::retry::RetryPolicy).

use crate::domain::FolderListing;

/// Port trait for the remote file store
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Lists the entries under `path`, following every continuation cursor
    ///
    /// `path` is a folder path; the empty string denotes the root. Entries
    /// are returned in provider order. A listing whose continuation pages
    /// could not all be fetched is returned with `complete == false`.
    ///
    /// # Errors
    /// Returns an error if the first page cannot be fetched or decoded.
    async fn list_folder(&self, path: &str, recursive: bool) -> anyhow::Result<FolderListing>;

    /// Requests a short-lived, directly fetchable URL for a single file
    async fn get_temporary_link(&self, path: &str) -> anyhow::Result<String>;
}
