//! Dropbox API client
//!
//! Provides a typed HTTP client for the Dropbox RPC endpoints. Every RPC
//! endpoint is a `POST` with a JSON body and a JSON answer; the client adds
//! the bearer token, builds the endpoint URL, classifies failures and runs
//! each call under its [`RetryPolicy`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dropsync_dropbox::{client::DropboxClient, listing};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DropboxClient::new("access-token-here");
//! let listing = listing::list_folder(&client, "", false).await?;
//! println!("{} entries", listing.entries.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use dropsync_core::retry::RetryPolicy;
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::DropboxError;

/// Base URL for the Dropbox RPC API
const DROPBOX_BASE_URL: &str = "https://api.dropboxapi.com/2";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by the RPC endpoints on 4xx/5xx
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_summary: Option<String>,
}

/// HTTP client for Dropbox API calls
///
/// Wraps `reqwest::Client` with authentication and endpoint construction.
pub struct DropboxClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// OAuth2 access token
    access_token: String,
    /// Retry schedule applied by [`DropboxClient::rpc_with_retry`]
    retry_policy: RetryPolicy,
}

impl DropboxClient {
    /// Creates a new client for the public API
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DROPBOX_BASE_URL)
    }

    /// Creates a new client with a custom base URL (useful for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: build_http_client(DEFAULT_TIMEOUT),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry schedule
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replaces the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated `POST` request for an RPC endpoint
    ///
    /// # Arguments
    /// * `endpoint` - Path relative to the base URL (e.g. "/files/list_folder")
    pub fn request(&self, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        self.client.post(url).bearer_auth(&self.access_token)
    }

    /// Performs a single RPC call without retrying
    pub async fn rpc<B, R>(&self, endpoint: &str, body: &B) -> Result<R, DropboxError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(endpoint, "Dropbox request");

        let response = self.request(endpoint).json(body).send().await?;
        let response = check_status(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            DropboxError::InvalidResponse(format!("{endpoint}: {e}"))
        })
    }

    /// Performs an RPC call under the client's retry policy
    ///
    /// 429 answers back off exponentially, other failures wait a flat delay,
    /// and undecodable bodies are returned at once.
    pub async fn rpc_with_retry<B, R>(
        &self,
        operation: &str,
        endpoint: &str,
        body: &B,
    ) -> Result<R, DropboxError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.retry_policy
            .run(operation, || self.rpc::<B, R>(endpoint, body))
            .await
    }
}

/// Builds the underlying HTTP client with the given timeout
fn build_http_client(timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
            Client::new()
        }
    }
}

/// Maps non-success statuses to [`DropboxError`]
async fn check_status(response: Response) -> Result<Response, DropboxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(DropboxError::TooManyRequests { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    Err(DropboxError::Api {
        status: status.as_u16(),
        summary: error_summary(&body),
    })
}

/// Extracts `error_summary` from an error body, falling back to the raw text
fn error_summary(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_summary)
        .unwrap_or_else(|| body.trim().to_string())
}
