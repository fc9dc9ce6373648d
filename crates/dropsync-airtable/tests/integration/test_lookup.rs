//! Integration tests for duplicate lookups, the connectivity check and
//! the IRecordTable adapter

use dropsync_airtable::provider::AirtableRecordTable;
use dropsync_airtable::records;
use dropsync_core::config::FieldNames;
use dropsync_core::ports::IRecordTable;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_find_by_field_returns_first_id() {
    let (server, client) = common::setup_airtable_mock().await;

    common::mount_lookup(
        &server,
        "{RemotePath} = '/shoots/a.jpg'",
        &["recExisting"],
    )
    .await;

    let found = records::find_by_field(&client, "RemotePath", "/shoots/a.jpg")
        .await
        .unwrap();
    assert_eq!(found.as_deref(), Some("recExisting"));
}

#[tokio::test]
async fn test_find_by_field_no_match() {
    let (server, client) = common::setup_airtable_mock().await;

    common::mount_lookup(&server, "{RemotePath} = '/shoots/new.jpg'", &[]).await;

    let found = records::find_by_field(&client, "RemotePath", "/shoots/new.jpg")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_find_by_field_escapes_quotes() {
    let (server, client) = common::setup_airtable_mock().await;

    common::mount_lookup(
        &server,
        "{RemotePath} = '/shoots/it\\'s.jpg'",
        &["recQuoted"],
    )
    .await;

    let found = records::find_by_field(&client, "RemotePath", "/shoots/it's.jpg")
        .await
        .unwrap();
    assert_eq!(found.as_deref(), Some("recQuoted"));
}

#[tokio::test]
async fn test_ping_requests_single_record() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("GET"))
        .and(path(common::TABLE_PATH))
        .and(query_param("maxRecords", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .expect(1)
        .mount(&server)
        .await;

    records::ping(&client).await.expect("ping failed");
}

#[tokio::test]
async fn test_ping_unauthorized() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("GET"))
        .and(path(common::TABLE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "type": "AUTHENTICATION_REQUIRED", "message": "Authentication required" }
        })))
        .mount(&server)
        .await;

    let err = records::ping(&client).await.unwrap_err();
    assert!(err.to_string().contains("AUTHENTICATION_REQUIRED"));
}

#[tokio::test]
async fn test_record_table_adapter_uses_configured_path_column() {
    let (server, client) = common::setup_airtable_mock().await;

    common::mount_lookup(&server, "{Dropbox Path} = '/docs/x.pdf'", &["recX"]).await;
    common::mount_create(&server, "recNew").await;

    let fields = FieldNames {
        remote_path: "Dropbox Path".into(),
        ..FieldNames::default()
    };
    let table = AirtableRecordTable::new(client, fields);

    assert_eq!(
        table.find_by_remote_path("/docs/x.pdf").await.unwrap().as_deref(),
        Some("recX")
    );

    let created = table
        .create_record(&common::sample_record("/docs/y.pdf"))
        .await
        .unwrap();
    assert_eq!(created.id, "recNew");
}
