//! Shared test helpers for Airtable API integration tests

use dropsync_airtable::client::AirtableClient;
use dropsync_core::domain::SyncRecord;
use dropsync_core::retry::RetryPolicy;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "pat-test-key";
pub const BASE_ID: &str = "appTestBase";
pub const TABLE: &str = "Media";
pub const TABLE_PATH: &str = "/appTestBase/Media";

/// Starts a mock server and returns a (MockServer, AirtableClient) tuple
pub async fn setup_airtable_mock() -> (MockServer, AirtableClient) {
    let server = MockServer::start().await;
    let client = AirtableClient::with_base_url(TEST_KEY, &server.uri(), BASE_ID, TABLE)
        .expect("mock server URL is valid")
        .with_retry_policy(RetryPolicy::fast(3));
    (server, client)
}

pub fn sample_record(path_lower: &str) -> SyncRecord {
    SyncRecord {
        file_name: path_lower.rsplit('/').next().unwrap_or_default().to_string(),
        remote_path: path_lower.to_string(),
        file_type: "jpg".into(),
        category: "Shoots".into(),
        date_created: Some("2025-03-01T09:30:00Z".parse().unwrap()),
        media_link: Some("https://dl.example/a".into()),
    }
}

/// Mounts a create endpoint answering with `record_id`
pub async fn mount_create(server: &MockServer, record_id: &str) {
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .and(header("authorization", format!("Bearer {TEST_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": record_id,
            "createdTime": "2025-03-01T10:00:00.000Z",
            "fields": {}
        })))
        .mount(server)
        .await;
}

/// Mounts a list endpoint answering the given formula with `ids`
pub async fn mount_lookup(server: &MockServer, formula: &str, ids: &[&str]) {
    let records: Vec<_> = ids
        .iter()
        .map(|id| json!({ "id": id, "createdTime": "2025-03-01T10:00:00.000Z", "fields": {} }))
        .collect();

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("filterByFormula", formula))
        .and(query_param("maxRecords", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": records })))
        .mount(server)
        .await;
}
