//! Airtable API client
//!
//! A client is scoped to one base and one table. Reads are `GET` requests on
//! the table URL with query parameters; writes are `POST` requests with a
//! JSON body. Both run under the client's [`RetryPolicy`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dropsync_airtable::{client::AirtableClient, records};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = AirtableClient::new("pat-token", "appXXXXXXXXXXXXXX", "Media")?;
//! records::ping(&client).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use dropsync_core::retry::RetryPolicy;
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::AirtableError;

/// Base URL for the Airtable REST API
const AIRTABLE_BASE_URL: &str = "https://api.airtable.com/v0";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body, either `{"error": {"type", "message"}}` or `{"error": "CODE"}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Typed {
        #[serde(rename = "type")]
        kind: String,
        message: Option<String>,
    },
    Code(String),
}

/// HTTP client for one Airtable table
pub struct AirtableClient {
    client: Client,
    /// Fully built `{base_url}/{base_id}/{table_name}` URL
    table_url: Url,
    api_key: String,
    retry_policy: RetryPolicy,
}

impl AirtableClient {
    /// Creates a client for the public API
    ///
    /// # Errors
    /// See [`AirtableClient::with_base_url`].
    pub fn new(
        api_key: impl Into<String>,
        base_id: &str,
        table_name: &str,
    ) -> Result<Self, AirtableError> {
        Self::with_base_url(api_key, AIRTABLE_BASE_URL, base_id, table_name)
    }

    /// Creates a client with a custom base URL (useful for testing)
    ///
    /// `base_id` and `table_name` are appended as percent-encoded path
    /// segments, so table names may contain spaces.
    ///
    /// # Errors
    /// Returns [`AirtableError::InvalidUrl`] if `base_url` cannot be parsed
    /// or cannot carry a path.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        base_id: &str,
        table_name: &str,
    ) -> Result<Self, AirtableError> {
        Ok(Self {
            client: build_http_client(DEFAULT_TIMEOUT),
            table_url: table_url(base_url, base_id, table_name)?,
            api_key: api_key.into(),
            retry_policy: RetryPolicy::default(),
        })
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

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Lists records with the given query parameters, without retrying
    pub async fn get_records<R>(&self, query: &[(&str, String)]) -> Result<R, AirtableError>
    where
        R: DeserializeOwned,
    {
        debug!(url = %self.table_url, "Airtable GET");
        let response = self
            .client
            .get(self.table_url.clone())
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        decode(check_status(response).await?).await
    }

    /// Posts a JSON body to the table, without retrying
    pub async fn post_record<B, R>(&self, body: &B) -> Result<R, AirtableError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url = %self.table_url, "Airtable POST");
        let response = self
            .client
            .post(self.table_url.clone())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        decode(check_status(response).await?).await
    }

    /// [`get_records`](Self::get_records) under the retry policy
    pub async fn get_records_with_retry<R>(
        &self,
        operation: &str,
        query: &[(&str, String)],
    ) -> Result<R, AirtableError>
    where
        R: DeserializeOwned,
    {
        self.retry_policy
            .run(operation, || self.get_records::<R>(query))
            .await
    }

    /// [`post_record`](Self::post_record) under the retry policy
    pub async fn post_record_with_retry<B, R>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<R, AirtableError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.retry_policy
            .run(operation, || self.post_record::<B, R>(body))
            .await
    }
}

/// Appends the base id and table name to `base_url`
fn table_url(base_url: &str, base_id: &str, table_name: &str) -> Result<Url, AirtableError> {
    let mut url =
        Url::parse(base_url).map_err(|e| AirtableError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| AirtableError::InvalidUrl(format!("{base_url}: cannot be a base")))?
        .pop_if_empty()
        .push(base_id)
        .push(table_name);
    Ok(url)
}

fn build_http_client(timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
            Client::new()
        }
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, AirtableError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| AirtableError::InvalidResponse(e.to_string()))
}

/// Maps non-success statuses to [`AirtableError`]
async fn check_status(response: Response) -> Result<Response, AirtableError> {
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
        return Err(AirtableError::TooManyRequests { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    Err(AirtableError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body).map(|b| b.error) {
        Ok(ErrorDetail::Typed {
            kind,
            message: Some(message),
        }) => format!("{kind}: {message}"),
        Ok(ErrorDetail::Typed { kind, message: None }) => kind,
        Ok(ErrorDetail::Code(code)) => code,
        Err(_) => body.trim().to_string(),
    }
}
