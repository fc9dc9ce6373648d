//! Remote entries returned by a folder listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Kind of a remote entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryTag {
    File,
    Folder,
}

/// A single file or folder in the remote store
///
/// Produced by a listing and consumed once per sync pass. Entries are
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    tag: EntryTag,
    name: String,
    path_lower: String,
    path_display: String,
    modified_time: Option<DateTime<Utc>>,
}

impl RemoteEntry {
    /// Creates a new entry
    ///
    /// # Errors
    /// Returns an error if the name is empty or either path does not start
    /// with `/`.
    pub fn new(
        tag: EntryTag,
        name: impl Into<String>,
        path_lower: impl Into<String>,
        path_display: impl Into<String>,
        modified_time: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let path_lower = path_lower.into();
        let path_display = path_display.into();

        if name.is_empty() {
            return Err(DomainError::ValidationFailed(
                "entry name must not be empty".to_string(),
            ));
        }
        for path in [&path_lower, &path_display] {
            if !path.starts_with('/') {
                return Err(DomainError::InvalidRemotePath(format!(
                    "Remote path must start with '/': {path}"
                )));
            }
        }

        Ok(Self {
            tag,
            name,
            path_lower,
            path_display,
            modified_time,
        })
    }

    /// Shorthand for a file entry whose display path equals its lower path
    ///
    /// # Errors
    /// See [`RemoteEntry::new`].
    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        modified_time: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        let path = path.into();
        Self::new(
            EntryTag::File,
            name,
            path.to_lowercase(),
            path,
            modified_time,
        )
    }

    /// Shorthand for a folder entry whose display path equals its lower path
    ///
    /// # Errors
    /// See [`RemoteEntry::new`].
    pub fn folder(name: impl Into<String>, path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        Self::new(EntryTag::Folder, name, path.to_lowercase(), path, None)
    }

    pub fn tag(&self) -> EntryTag {
        self.tag
    }

    pub fn is_file(&self) -> bool {
        self.tag == EntryTag::File
    }

    pub fn is_folder(&self) -> bool {
        self.tag == EntryTag::Folder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased path, used as the stable identity of the entry
    pub fn path_lower(&self) -> &str {
        &self.path_lower
    }

    /// Path with the original casing
    pub fn path_display(&self) -> &str {
        &self.path_display
    }

    pub fn modified_time(&self) -> Option<DateTime<Utc>> {
        self.modified_time
    }
}

/// Result of listing a remote folder
///
/// `complete` is false when a continuation page could not be fetched after
/// all retries; `entries` then holds only the pages fetched before the
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub entries: Vec<RemoteEntry>,
    pub complete: bool,
}

impl FolderListing {
    /// A listing that contains every page
    pub fn complete(entries: Vec<RemoteEntry>) -> Self {
        Self {
            entries,
            complete: true,
        }
    }

    /// A listing truncated by a failed continuation page
    pub fn partial(entries: Vec<RemoteEntry>) -> Self {
        Self {
            entries,
            complete: false,
        }
    }

    /// Iterates over the file entries in listing order
    pub fn files(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }

    /// Iterates over the folder entries in listing order
    pub fn folders(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.entries.iter().filter(|e| e.is_folder())
    }
}
