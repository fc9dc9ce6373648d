//! DropboxRemoteStore - IRemoteStore implementation for the Dropbox API
//!
//! Wraps the [`DropboxClient`] and delegates to the listing and links
//! modules to fulfil the [`IRemoteStore`] port contract.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use dropsync_core::config::Config;
use dropsync_core::domain::FolderListing;
use dropsync_core::ports::IRemoteStore;
use dropsync_core::retry::RetryPolicy;

use crate::client::DropboxClient;
use crate::{links, listing};

/// Dropbox-backed implementation of [`IRemoteStore`]
pub struct DropboxRemoteStore {
    client: DropboxClient,
    include_media_info: bool,
}

impl DropboxRemoteStore {
    /// Creates a store around an already configured client
    pub fn new(client: DropboxClient) -> Self {
        Self {
            client,
            include_media_info: false,
        }
    }

    /// Builds a store from the loaded configuration
    ///
    /// # Errors
    /// Returns an error if no Dropbox access token is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config
            .dropbox
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("Dropbox access token is not configured")?;

        let client = DropboxClient::with_base_url(token, &config.dropbox.api_base_url)
            .with_timeout(Duration::from_secs(config.sync.request_timeout_secs))
            .with_retry_policy(RetryPolicy::from(&config.sync));

        Ok(Self {
            client,
            include_media_info: config.dropbox.include_media_info,
        })
    }

    pub fn client(&self) -> &DropboxClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DropboxRemoteStore {
    async fn list_folder(&self, path: &str, recursive: bool) -> Result<FolderListing> {
        debug!(path, recursive, "Listing remote folder");
        listing::list_folder_with_media(&self.client, path, recursive, self.include_media_info)
            .await
            .with_context(|| format!("Failed to list folder '{path}'"))
    }

    async fn get_temporary_link(&self, path: &str) -> Result<String> {
        links::get_temporary_link(&self.client, path)
            .await
            .with_context(|| format!("Failed to get temporary link for '{path}'"))
    }
}
