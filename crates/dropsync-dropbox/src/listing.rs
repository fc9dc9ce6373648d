//! Dropbox folder listings
//!
//! Implements `files/list_folder` with transparent cursor pagination.
//!
//! ## Listing Flow
//!
//! 1. **First page**: `files/list_folder` with the path and `recursive` flag.
//!    Failure here (after retries) is returned to the caller.
//! 2. **Follow pages**: while `has_more` is set, `files/list_folder/continue`
//!    is called with the returned cursor and the entries are appended in page
//!    order.
//! 3. **Truncation**: if a continuation page still fails after retries, the
//!    entries collected so far are returned as a partial [`FolderListing`].
//!    An undecodable page is an error like on the first page.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dropsync_dropbox::{client::DropboxClient, listing};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DropboxClient::new("access-token");
//! let listing = listing::list_folder(&client, "/Shoots", true).await?;
//! if !listing.complete {
//!     println!("listing truncated after {} entries", listing.entries.len());
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dropsync_core::domain::{EntryTag, FolderListing, RemoteEntry};

use crate::{client::DropboxClient, DropboxError};

/// Endpoint for the first listing page
const LIST_FOLDER_PATH: &str = "/files/list_folder";

/// Endpoint for continuation pages
const LIST_FOLDER_CONTINUE_PATH: &str = "/files/list_folder/continue";

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ListFolderArg<'a> {
    path: &'a str,
    recursive: bool,
    include_media_info: bool,
}

#[derive(Debug, Serialize)]
struct ListFolderContinueArg<'a> {
    cursor: &'a str,
}

/// Raw page returned by both listing endpoints
///
/// See: <https://www.dropbox.com/developers/documentation/http/documentation#files-list_folder>
#[derive(Debug, Deserialize)]
struct ListFolderResult {
    #[serde(default)]
    entries: Vec<DropboxMetadata>,

    /// Cursor for `list_folder/continue`
    cursor: Option<String>,

    /// Whether more pages are available
    #[serde(default)]
    has_more: bool,
}

/// One entry of a listing page
#[derive(Debug, Deserialize)]
struct DropboxMetadata {
    /// `file`, `folder` or `deleted`
    #[serde(rename = ".tag")]
    tag: String,

    name: String,

    /// Absent for entries outside the user's mounted namespaces
    path_lower: Option<String>,

    path_display: Option<String>,

    /// Modification time as reported by the uploading client (files only)
    client_modified: Option<DateTime<Utc>>,

    /// Last modification time on the server (files only)
    server_modified: Option<DateTime<Utc>>,
}

// ============================================================================
// ListingParser - converts listing pages to domain entries
// ============================================================================

/// Converts raw listing pages into [`RemoteEntry`] values
struct ListingParser;

impl ListingParser {
    /// Parses a single metadata entry
    ///
    /// Returns `None` for tags other than `file`/`folder` and for entries
    /// without a usable path.
    fn parse_entry(meta: DropboxMetadata) -> Option<RemoteEntry> {
        let tag = match meta.tag.as_str() {
            "file" => EntryTag::File,
            "folder" => EntryTag::Folder,
            other => {
                debug!(tag = other, name = %meta.name, "Skipping listing entry");
                return None;
            }
        };

        let Some(path_lower) = meta.path_lower else {
            debug!(name = %meta.name, "Skipping entry without path");
            return None;
        };
        let path_display = meta.path_display.unwrap_or_else(|| path_lower.clone());
        let modified = meta.client_modified.or(meta.server_modified);

        match RemoteEntry::new(tag, meta.name, path_lower, path_display, modified) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping malformed listing entry");
                None
            }
        }
    }

    /// Parses every entry of a page, preserving order
    fn parse_entries(entries: Vec<DropboxMetadata>) -> Vec<RemoteEntry> {
        entries.into_iter().filter_map(Self::parse_entry).collect()
    }
}

// ============================================================================
// Listing functions
// ============================================================================

/// Lists `path`, following every continuation cursor
///
/// Media info is not requested; see [`list_folder_with_media`].
pub async fn list_folder(
    client: &DropboxClient,
    path: &str,
    recursive: bool,
) -> Result<FolderListing, DropboxError> {
    list_folder_with_media(client, path, recursive, false).await
}

/// Lists `path`, following every continuation cursor
///
/// # Arguments
///
/// * `client` - Authenticated [`DropboxClient`]
/// * `path` - Folder path; the empty string is the root
/// * `recursive` - Include every descendant, not only direct children
/// * `include_media_info` - Ask for photo/video metadata
///
/// # Errors
///
/// Returns an error if the first page cannot be fetched or any page cannot
/// be decoded. Later pages that fail after retries yield a partial listing
/// instead.
pub async fn list_folder_with_media(
    client: &DropboxClient,
    path: &str,
    recursive: bool,
    include_media_info: bool,
) -> Result<FolderListing, DropboxError> {
    debug!(path, recursive, "Starting folder listing");

    let arg = ListFolderArg {
        path,
        recursive,
        include_media_info,
    };
    let first: ListFolderResult = client
        .rpc_with_retry("list_folder", LIST_FOLDER_PATH, &arg)
        .await?;

    let mut entries = ListingParser::parse_entries(first.entries);
    let mut cursor = next_cursor(first.has_more, first.cursor);

    debug!(
        items = entries.len(),
        has_more = cursor.is_some(),
        "Received first listing page"
    );

    let mut page_count: u32 = 1;
    while let Some(current) = cursor.take() {
        page_count += 1;

        let page = match list_folder_continue(client, &current).await {
            Ok(page) => page,
            Err(e @ DropboxError::InvalidResponse(_)) => return Err(e),
            Err(e) => {
                warn!(
                    path,
                    page = page_count,
                    items = entries.len(),
                    error = %e,
                    "Continuation page failed, returning partial listing"
                );
                return Ok(FolderListing::partial(entries));
            }
        };

        debug!(
            page = page_count,
            items = page.entries.len(),
            has_more = page.has_more,
            "Received listing page"
        );

        entries.extend(ListingParser::parse_entries(page.entries));
        cursor = next_cursor(page.has_more, page.cursor);
    }

    debug!(
        path,
        total_items = entries.len(),
        total_pages = page_count,
        "Folder listing complete"
    );

    Ok(FolderListing::complete(entries))
}

/// Fetches one continuation page
async fn list_folder_continue(
    client: &DropboxClient,
    cursor: &str,
) -> Result<ListFolderResult, DropboxError> {
    let arg = ListFolderContinueArg { cursor };
    client
        .rpc_with_retry("list_folder_continue", LIST_FOLDER_CONTINUE_PATH, &arg)
        .await
}

/// The cursor to follow, if the page says more results exist
fn next_cursor(has_more: bool, cursor: Option<String>) -> Option<String> {
    if has_more {
        cursor.filter(|c| !c.is_empty())
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
