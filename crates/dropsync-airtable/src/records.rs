//! Table record operations
//!
//! Maps [`SyncRecord`] values onto the configured column names and wraps
//! the three table calls the sync needs.
//!
//! ## Field mapping
//!
//! | Record field   | Column (default) | Written when                     |
//! |----------------|------------------|----------------------------------|
//! | `file_name`    | `FileName`       | always                           |
//! | `remote_path`  | `RemotePath`     | always                           |
//! | `file_type`    | `FileType`       | always                           |
//! | `category`     | `Category`       | always                           |
//! | `date_created` | `DateCreated`    | the entry carried a timestamp    |
//! | `media_link`   | `MediaLink`      | a link was resolved              |
//! | link           | attachment       | link resolved and column set     |
//! | media kind     | kind column      | column set                       |

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use dropsync_core::config::FieldNames;
use dropsync_core::domain::SyncRecord;
use dropsync_core::ports::CreatedRecord;

use crate::{client::AirtableClient, AirtableError};

#[derive(Debug, Serialize)]
struct CreateRecordRequest {
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    id: String,
    #[serde(rename = "createdTime")]
    created_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    records: Vec<RecordRef>,
}

#[derive(Debug, Deserialize)]
struct RecordRef {
    id: String,
}

/// Builds the `fields` object for a record
pub fn record_fields(record: &SyncRecord, names: &FieldNames) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(names.file_name.clone(), json!(record.file_name));
    fields.insert(names.remote_path.clone(), json!(record.remote_path));
    fields.insert(names.file_type.clone(), json!(record.file_type));
    fields.insert(names.category.clone(), json!(record.category));

    if let Some(created) = record.date_created {
        fields.insert(
            names.date_created.clone(),
            json!(created.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }

    if let Some(link) = &record.media_link {
        fields.insert(names.media_link.clone(), json!(link));
        if let Some(column) = &names.media_attachment {
            fields.insert(column.clone(), json!([{ "url": link }]));
        }
    }

    if let Some(column) = &names.media_kind {
        fields.insert(column.clone(), json!(record.media_kind().as_str()));
    }

    fields
}

/// Escapes a value for use inside a single-quoted formula string
pub fn escape_formula_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Formula matching records whose `field` equals `value`
pub fn equality_formula(field: &str, value: &str) -> String {
    format!("{{{field}}} = '{}'", escape_formula_string(value))
}

/// Creates one record
///
/// # Errors
/// Returns the last error once the retry schedule is exhausted.
pub async fn create_record(
    client: &AirtableClient,
    record: &SyncRecord,
    names: &FieldNames,
) -> Result<CreatedRecord, AirtableError> {
    let request = CreateRecordRequest {
        fields: record_fields(record, names),
    };
    let response: CreateRecordResponse = client
        .post_record_with_retry("create_record", &request)
        .await?;

    debug!(id = %response.id, path = %record.remote_path, "Record created");
    Ok(CreatedRecord {
        id: response.id,
        created_time: response.created_time,
    })
}

/// Returns the id of the first record whose `field` equals `value`
pub async fn find_by_field(
    client: &AirtableClient,
    field: &str,
    value: &str,
) -> Result<Option<String>, AirtableError> {
    let query = [
        ("filterByFormula", equality_formula(field, value)),
        ("maxRecords", "1".to_string()),
    ];
    let response: ListRecordsResponse = client
        .get_records_with_retry("find_record", &query)
        .await?;
    Ok(response.records.into_iter().next().map(|r| r.id))
}

/// Reads at most one record to verify credentials and table access
pub async fn ping(client: &AirtableClient) -> Result<(), AirtableError> {
    let query = [("maxRecords", "1".to_string())];
    let _: ListRecordsResponse = client.get_records_with_retry("ping", &query).await?;
    Ok(())
}
