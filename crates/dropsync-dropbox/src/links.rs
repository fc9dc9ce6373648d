//! Temporary file links
//!
//! `files/get_temporary_link` returns a short-lived URL that can be fetched
//! directly without credentials. The link is only valid for a few hours, so
//! it is stored as-is and never cached between runs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{client::DropboxClient, DropboxError};

const GET_TEMPORARY_LINK_PATH: &str = "/files/get_temporary_link";

#[derive(Debug, Serialize)]
struct GetTemporaryLinkArg<'a> {
    path: &'a str,
}

#[derive(Debug, Deserialize)]
struct GetTemporaryLinkResult {
    link: String,
}

/// Requests a temporary link for the file at `path`
///
/// # Errors
///
/// Returns the last error once the retry schedule is exhausted, or
/// [`DropboxError::InvalidResponse`] if the answer has no usable link.
pub async fn get_temporary_link(client: &DropboxClient, path: &str) -> Result<String, DropboxError> {
    let arg = GetTemporaryLinkArg { path };
    let result: GetTemporaryLinkResult = client
        .rpc_with_retry("get_temporary_link", GET_TEMPORARY_LINK_PATH, &arg)
        .await?;

    if result.link.trim().is_empty() {
        return Err(DropboxError::InvalidResponse(format!(
            "empty temporary link for {path}"
        )));
    }

    debug!(path, "Obtained temporary link");
    Ok(result.link)
}
