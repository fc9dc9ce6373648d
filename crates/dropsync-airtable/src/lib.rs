//! dropsync Airtable - Airtable REST API client
//!
//! Provides an async client for the single table the sync writes to:
//! - Record creation with configurable column names
//! - Equality lookups through `filterByFormula`
//! - A cheap `maxRecords=1` read used as a connectivity check
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client scoped to one base and table
//! - [`records`] - Field mapping, formula escaping and record operations
//! - [`provider`] - [`IRecordTable`](dropsync_core::ports::IRecordTable) adapter

pub mod client;
pub mod provider;
pub mod records;

use std::time::Duration;

use dropsync_core::retry::{FailureKind, Retryable};
use thiserror::Error;

/// Errors that can occur when communicating with the Airtable API
#[derive(Debug, Error)]
pub enum AirtableError {
    /// Rate limit exceeded (HTTP 429)
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Value of the `Retry-After` header, when present
        retry_after: Option<Duration>,
    },

    /// The API answered with a non-success status
    #[error("Airtable API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error type and message from the body, or the raw body
        message: String,
    },

    /// A network-level error occurred (connect, timeout, reset)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The table URL could not be built from the configured base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl AirtableError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::TooManyRequests { .. })
    }
}

impl Retryable for AirtableError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Self::TooManyRequests { .. } => FailureKind::RateLimited,
            Self::Api { .. } | Self::NetworkError(_) => FailureKind::Transient,
            Self::InvalidResponse(_) | Self::InvalidUrl(_) => FailureKind::Fatal,
        }
    }
}
