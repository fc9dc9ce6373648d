//! dropsync Dropbox - Dropbox API v2 client
//!
//! Provides an async client for the parts of the Dropbox API the sync needs:
//! - Folder listings with transparent cursor pagination
//! - Temporary (short-lived, directly fetchable) file links
//!
//! Every call runs under the shared [`RetryPolicy`](dropsync_core::retry::RetryPolicy).
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client for the RPC endpoints
//! - [`listing`] - `files/list_folder` and `files/list_folder/continue`
//! - [`links`] - `files/get_temporary_link`
//! - [`provider`] - [`IRemoteStore`](dropsync_core::ports::IRemoteStore) adapter

pub mod client;
pub mod links;
pub mod listing;
pub mod provider;

use std::time::Duration;

use dropsync_core::retry::{FailureKind, Retryable};
use thiserror::Error;

/// Errors that can occur when communicating with the Dropbox API
#[derive(Debug, Error)]
pub enum DropboxError {
    /// Rate limit exceeded (HTTP 429)
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Value of the `Retry-After` header, when present
        retry_after: Option<Duration>,
    },

    /// The API answered with a non-success status
    #[error("Dropbox API error ({status}): {summary}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `error_summary` from the body, or the raw body
        summary: String,
    },

    /// A network-level error occurred (connect, timeout, reset)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DropboxError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::TooManyRequests { .. })
    }
}

impl Retryable for DropboxError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Self::TooManyRequests { .. } => FailureKind::RateLimited,
            Self::Api { .. } | Self::NetworkError(_) => FailureKind::Transient,
            Self::InvalidResponse(_) => FailureKind::Fatal,
        }
    }
}
