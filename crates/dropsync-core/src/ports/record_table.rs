//! Record table port
//!
//! Interface for the destination table the records are written to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SyncRecord;

/// A row created in the destination table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    /// Table-assigned record id
    pub id: String,
    /// Creation time reported by the table, when available
    pub created_time: Option<DateTime<Utc>>,
}

/// Port trait for the destination table
#[async_trait::async_trait]
pub trait IRecordTable: Send + Sync {
    /// Returns the id of a record whose remote path equals `remote_path`
    async fn find_by_remote_path(&self, remote_path: &str) -> anyhow::Result<Option<String>>;

    /// Creates a new row for `record`
    ///
    /// Rate-limit responses are retried by the implementation; any error
    /// returned here means the record was not created.
    async fn create_record(&self, record: &SyncRecord) -> anyhow::Result<CreatedRecord>;

    /// Cheap read used as a connectivity smoke test before a run
    async fn ping(&self) -> anyhow::Result<()>;
}
