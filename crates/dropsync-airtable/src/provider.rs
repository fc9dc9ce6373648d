//! AirtableRecordTable - IRecordTable implementation for Airtable
//!
//! Wraps the [`AirtableClient`] together with the configured column names
//! and delegates to the records module.

use std::time::Duration;

use anyhow::{Context, Result};

use dropsync_core::config::{Config, FieldNames};
use dropsync_core::domain::SyncRecord;
use dropsync_core::ports::{CreatedRecord, IRecordTable};
use dropsync_core::retry::RetryPolicy;

use crate::client::AirtableClient;
use crate::records;

/// Airtable-backed implementation of [`IRecordTable`]
pub struct AirtableRecordTable {
    client: AirtableClient,
    fields: FieldNames,
}

impl AirtableRecordTable {
    pub fn new(client: AirtableClient, fields: FieldNames) -> Self {
        Self { client, fields }
    }

    /// Builds a table adapter from the loaded configuration
    ///
    /// # Errors
    /// Returns an error if a credential is missing or the API URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let airtable = &config.airtable;
        let required = |value: &Option<String>, what: &str| -> Result<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .with_context(|| format!("Airtable {what} is not configured"))
        };

        let api_key = required(&airtable.api_key, "API key")?;
        let base_id = required(&airtable.base_id, "base id")?;
        let table_name = required(&airtable.table_name, "table name")?;

        let client =
            AirtableClient::with_base_url(api_key, &airtable.api_base_url, &base_id, &table_name)
                .context("Invalid Airtable API URL")?
                .with_timeout(Duration::from_secs(config.sync.request_timeout_secs))
                .with_retry_policy(RetryPolicy::from(&config.sync));

        Ok(Self::new(client, airtable.fields.clone()))
    }

    pub fn client(&self) -> &AirtableClient {
        &self.client
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }
}

#[async_trait::async_trait]
impl IRecordTable for AirtableRecordTable {
    async fn find_by_remote_path(&self, remote_path: &str) -> Result<Option<String>> {
        records::find_by_field(&self.client, &self.fields.remote_path, remote_path)
            .await
            .with_context(|| format!("Failed to look up record for '{remote_path}'"))
    }

    async fn create_record(&self, record: &SyncRecord) -> Result<CreatedRecord> {
        records::create_record(&self.client, record, &self.fields)
            .await
            .with_context(|| format!("Failed to create record for '{}'", record.remote_path))
    }

    async fn ping(&self) -> Result<()> {
        records::ping(&self.client)
            .await
            .context("Airtable connectivity check failed")
    }
}
