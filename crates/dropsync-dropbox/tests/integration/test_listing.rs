//! Integration tests for folder listings
//!
//! - Single page and multi-page listings
//! - Rate limiting on the first page (bounded attempts)
//! - Continuation failure yielding a partial listing
//! - Malformed bodies on any page (never retried, always an error)

use dropsync_dropbox::listing;
use dropsync_dropbox::DropboxError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_list_root_returns_files_and_folders() {
    let (server, client) = common::setup_dropbox_mock().await;

    common::mount_list_folder_single_page(
        &server,
        "",
        json!([
            common::folder_entry("Shoots", "/Shoots"),
            common::folder_entry("Docs", "/Docs"),
            common::file_entry("readme.txt", "/readme.txt"),
        ]),
    )
    .await;

    let result = listing::list_folder(&client, "", false)
        .await
        .expect("listing root failed");

    assert!(result.complete);
    assert_eq!(result.entries.len(), 3);
    assert_eq!(result.folders().count(), 2);
    assert_eq!(result.files().count(), 1);
    assert_eq!(result.entries[0].path_display(), "/Shoots");
}

#[tokio::test]
async fn test_list_folder_follows_cursor_in_order() {
    let (server, client) = common::setup_dropbox_mock().await;

    common::mount_list_folder_paginated(
        &server,
        "/Shoots",
        json!([
            common::file_entry("a.jpg", "/Shoots/a.jpg"),
            common::folder_entry("2024", "/Shoots/2024"),
        ]),
        json!([common::file_entry("b.mp4", "/Shoots/2024/b.mp4")]),
    )
    .await;

    let result = listing::list_folder(&client, "/Shoots", true)
        .await
        .expect("paginated listing failed");

    assert!(result.complete);
    let names: Vec<&str> = result.entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["a.jpg", "2024", "b.mp4"]);
}

#[tokio::test]
async fn test_list_folder_sends_recursive_flag() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .and(body_partial_json(json!({
            "path": "/Docs",
            "recursive": true,
            "include_media_info": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [],
            "cursor": "c",
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = listing::list_folder(&client, "/Docs", true).await.unwrap();
    assert!(result.entries.is_empty());
    assert!(result.complete);
}

#[tokio::test]
async fn test_always_rate_limited_gives_up_after_three_attempts() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .expect(3)
        .mount(&server)
        .await;

    let err = listing::list_folder(&client, "", false)
        .await
        .expect_err("listing should fail");

    assert!(err.is_rate_limit());
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    common::mount_list_folder_single_page(
        &server,
        "",
        json!([common::folder_entry("Shoots", "/Shoots")]),
    )
    .await;

    let result = listing::list_folder(&client, "", false).await.unwrap();
    assert_eq!(result.entries.len(), 1);
}

#[tokio::test]
async fn test_continuation_failure_returns_partial_listing() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                common::file_entry("a.jpg", "/Shoots/a.jpg"),
                common::file_entry("b.jpg", "/Shoots/b.jpg"),
            ],
            "cursor": "cursor-page2",
            "has_more": true
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder/continue"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(3)
        .mount(&server)
        .await;

    let result = listing::list_folder(&client, "/Shoots", true)
        .await
        .expect("partial listing should not be an error");

    assert!(!result.complete);
    assert_eq!(result.entries.len(), 2);
}

#[tokio::test]
async fn test_malformed_continuation_page_is_an_error() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [common::file_entry("a.jpg", "/Shoots/a.jpg")],
            "cursor": "cursor-page2",
            "has_more": true
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder/continue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"entries\": [trunc"))
        .expect(1)
        .mount(&server)
        .await;

    let err = listing::list_folder(&client, "/Shoots", true)
        .await
        .unwrap_err();
    assert!(matches!(err, DropboxError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_malformed_body_is_not_retried() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = listing::list_folder(&client, "", false).await.unwrap_err();
    assert!(matches!(err, DropboxError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_api_error_carries_summary() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/..",
            "error": { ".tag": "path", "path": { ".tag": "not_found" } }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let err = listing::list_folder(&client, "/missing", false)
        .await
        .unwrap_err();

    match err {
        DropboxError::Api { status, summary } => {
            assert_eq!(status, 409);
            assert_eq!(summary, "path/not_found/..");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
