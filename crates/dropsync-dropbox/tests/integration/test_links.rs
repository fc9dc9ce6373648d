//! Integration tests for temporary links and the IRemoteStore adapter

use dropsync_core::ports::IRemoteStore;
use dropsync_dropbox::links;
use dropsync_dropbox::provider::DropboxRemoteStore;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_get_temporary_link_success() {
    let (server, client) = common::setup_dropbox_mock().await;

    common::mount_temporary_link(
        &server,
        "/shoots/a.jpg",
        "https://dl.dropboxusercontent.com/apitl/1/a",
    )
    .await;

    let link = links::get_temporary_link(&client, "/shoots/a.jpg")
        .await
        .expect("temporary link failed");
    assert_eq!(link, "https://dl.dropboxusercontent.com/apitl/1/a");
}

#[tokio::test]
async fn test_get_temporary_link_not_found() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/get_temporary_link"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/.",
        })))
        .mount(&server)
        .await;

    let err = links::get_temporary_link(&client, "/missing.jpg")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("path/not_found"));
}

#[tokio::test]
async fn test_get_temporary_link_rejects_empty_link() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/get_temporary_link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "link": "" })))
        .mount(&server)
        .await;

    assert!(links::get_temporary_link(&client, "/a.jpg").await.is_err());
}

#[tokio::test]
async fn test_remote_store_adapter_delegates() {
    let (server, client) = common::setup_dropbox_mock().await;

    common::mount_list_folder_single_page(
        &server,
        "",
        json!([common::folder_entry("Shoots", "/Shoots")]),
    )
    .await;
    common::mount_temporary_link(&server, "/shoots/a.jpg", "https://example.test/a").await;

    let store = DropboxRemoteStore::new(client);

    let listing = store.list_folder("", false).await.unwrap();
    assert_eq!(listing.entries.len(), 1);
    assert!(listing.entries[0].is_folder());

    let link = store.get_temporary_link("/shoots/a.jpg").await.unwrap();
    assert_eq!(link, "https://example.test/a");
}

#[tokio::test]
async fn test_remote_store_adapter_adds_context() {
    let (server, client) = common::setup_dropbox_mock().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_access_token"))
        .mount(&server)
        .await;

    let store = DropboxRemoteStore::new(client);
    let err = store.list_folder("/Shoots", true).await.unwrap_err();
    assert!(err.to_string().contains("/Shoots"));
}
