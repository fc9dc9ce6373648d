//! Shared test helpers for Dropbox API integration tests
//!
//! Each helper mounts the necessary mock endpoints on a [`MockServer`];
//! [`setup_dropbox_mock`] returns a client pointing at it with a fast
//! retry schedule.

use dropsync_core::retry::RetryPolicy;
use dropsync_dropbox::client::DropboxClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-access-token";

/// Starts a mock server and returns a (MockServer, DropboxClient) tuple
///
/// The client retries up to three times with millisecond delays.
pub async fn setup_dropbox_mock() -> (MockServer, DropboxClient) {
    let server = MockServer::start().await;
    let client = DropboxClient::with_base_url(TEST_TOKEN, server.uri())
        .with_retry_policy(RetryPolicy::fast(3));
    (server, client)
}

pub fn file_entry(name: &str, path_display: &str) -> Value {
    json!({
        ".tag": "file",
        "name": name,
        "path_lower": path_display.to_lowercase(),
        "path_display": path_display,
        "id": format!("id:{name}"),
        "client_modified": "2025-03-01T09:30:00Z",
        "server_modified": "2025-03-01T09:31:00Z",
        "rev": "015d9c3a1b2c3d4e00000001",
        "size": 2048
    })
}

pub fn folder_entry(name: &str, path_display: &str) -> Value {
    json!({
        ".tag": "folder",
        "name": name,
        "path_lower": path_display.to_lowercase(),
        "path_display": path_display,
        "id": format!("id:{name}")
    })
}

/// Mounts a single-page `list_folder` answer for `folder`
pub async fn mount_list_folder_single_page(server: &MockServer, folder: &str, entries: Value) {
    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_partial_json(json!({ "path": folder })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": entries,
            "cursor": "cursor-final",
            "has_more": false
        })))
        .mount(server)
        .await;
}

/// Mounts a two-page listing for `folder`
///
/// The first page returns `cursor-page2`; the continuation endpoint answers
/// that cursor with the second page.
pub async fn mount_list_folder_paginated(
    server: &MockServer,
    folder: &str,
    page1: Value,
    page2: Value,
) {
    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .and(body_partial_json(json!({ "path": folder })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": page1,
            "cursor": "cursor-page2",
            "has_more": true
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder/continue"))
        .and(body_partial_json(json!({ "cursor": "cursor-page2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": page2,
            "cursor": "cursor-final",
            "has_more": false
        })))
        .mount(server)
        .await;
}

/// Mounts a `get_temporary_link` answer for `file_path`
pub async fn mount_temporary_link(server: &MockServer, file_path: &str, link: &str) {
    Mock::given(method("POST"))
        .and(path("/files/get_temporary_link"))
        .and(body_partial_json(json!({ "path": file_path })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "link": link,
            "metadata": {
                ".tag": "file",
                "name": "file",
                "path_lower": file_path.to_lowercase()
            }
        })))
        .mount(server)
        .await;
}
