//! Integration tests for record creation
//!
//! - Field payload sent to the table
//! - Rate limiting (bounded attempts, recovery)
//! - Permanent failures and malformed bodies

use dropsync_airtable::records;
use dropsync_airtable::AirtableError;
use dropsync_core::config::FieldNames;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_create_record_sends_mapped_fields() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("POST"))
        .and(path(common::TABLE_PATH))
        .and(body_json(json!({
            "fields": {
                "FileName": "a.jpg",
                "RemotePath": "/shoots/a.jpg",
                "FileType": "jpg",
                "Category": "Shoots",
                "DateCreated": "2025-03-01T09:30:00Z",
                "MediaLink": "https://dl.example/a"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "recAAA",
            "createdTime": "2025-03-01T10:00:00.000Z",
            "fields": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = records::create_record(
        &client,
        &common::sample_record("/shoots/a.jpg"),
        &FieldNames::default(),
    )
    .await
    .expect("create failed");

    assert_eq!(created.id, "recAAA");
    assert!(created.created_time.is_some());
}

#[tokio::test]
async fn test_create_record_always_rate_limited() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("POST"))
        .and(path(common::TABLE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errors": [{ "error": "RATE_LIMIT_REACHED" }]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let err = records::create_record(
        &client,
        &common::sample_record("/shoots/a.jpg"),
        &FieldNames::default(),
    )
    .await
    .unwrap_err();

    assert!(err.is_rate_limit());
}

#[tokio::test]
async fn test_create_record_recovers_after_rate_limit() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("POST"))
        .and(path(common::TABLE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    common::mount_create(&server, "recAfterRetry").await;

    let created = records::create_record(
        &client,
        &common::sample_record("/shoots/a.jpg"),
        &FieldNames::default(),
    )
    .await
    .unwrap();

    assert_eq!(created.id, "recAfterRetry");
}

#[tokio::test]
async fn test_create_record_unprocessable_is_retried_then_reported() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("POST"))
        .and(path(common::TABLE_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {
                "type": "UNKNOWN_FIELD_NAME",
                "message": "Unknown field name: \"RemotePath\""
            }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let err = records::create_record(
        &client,
        &common::sample_record("/shoots/a.jpg"),
        &FieldNames::default(),
    )
    .await
    .unwrap_err();

    match err {
        AirtableError::Api { status, message } => {
            assert_eq!(status, 422);
            assert!(message.starts_with("UNKNOWN_FIELD_NAME"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_record_malformed_body_not_retried() {
    let (server, client) = common::setup_airtable_mock().await;

    Mock::given(method("POST"))
        .and(path(common::TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = records::create_record(
        &client,
        &common::sample_record("/shoots/a.jpg"),
        &FieldNames::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AirtableError::InvalidResponse(_)));
}
