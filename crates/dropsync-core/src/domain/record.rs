//! Destination-table records
//!
//! A [`SyncRecord`] is the row written to the destination table for one
//! remote file. Records are built once from a [`RemoteEntry`] and never
//! mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{entry::RemoteEntry, errors::DomainError};

/// File type used when a name has no `.` at all
pub const UNKNOWN_FILE_TYPE: &str = "unknown";

/// Derives the file type from a file name
///
/// Returns the text after the last `.`, lower-cased. Names without any `.`
/// yield [`UNKNOWN_FILE_TYPE`]. A name whose only dot is the leading one
/// (`".hidden"`) has no extension and yields `""`, as does a trailing dot
/// (`"file."`).
pub fn file_type_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some(("", _)) => String::new(),
        Some((_, ext)) => ext.to_lowercase(),
        None => UNKNOWN_FILE_TYPE.to_string(),
    }
}

/// Coarse media classification of a file type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Classifies a lower-cased file type as returned by [`file_type_of`]
    pub fn from_file_type(file_type: &str) -> Self {
        match file_type {
            "jpg" | "jpeg" | "png" | "gif" | "heic" | "webp" => Self::Image,
            "mp4" | "mov" | "avi" | "mkv" => Self::Video,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One destination-table row describing a synced remote file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub file_name: String,
    /// Lower-cased remote path, also the key used for duplicate lookups
    pub remote_path: String,
    pub file_type: String,
    /// Name of the top-level folder the file was found under
    pub category: String,
    pub date_created: Option<DateTime<Utc>>,
    pub media_link: Option<String>,
}

impl SyncRecord {
    /// Builds a record for a file entry
    ///
    /// `date_created` is taken from the entry's modification time when
    /// present. `media_link` is only set when a link was resolved.
    ///
    /// # Errors
    /// Returns an error if `entry` is not a file or `category` is empty.
    pub fn from_entry(
        entry: &RemoteEntry,
        category: &str,
        media_link: Option<String>,
    ) -> Result<Self, DomainError> {
        if !entry.is_file() {
            return Err(DomainError::InvalidRecord(format!(
                "not a file: {}",
                entry.path_display()
            )));
        }
        if category.is_empty() {
            return Err(DomainError::InvalidRecord(format!(
                "empty category for {}",
                entry.path_display()
            )));
        }

        Ok(Self {
            file_name: entry.name().to_string(),
            remote_path: entry.path_lower().to_string(),
            file_type: file_type_of(entry.name()),
            category: category.to_string(),
            date_created: entry.modified_time(),
            media_link,
        })
    }

    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_file_type(&self.file_type)
    }
}
