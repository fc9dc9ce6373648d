//! Domain types
//!
//! - Remote entries as produced by a folder listing
//! - Destination-table records and the file type rules used to build them
//! - Domain-specific error types

pub mod entry;
pub mod errors;
pub mod record;

pub use entry::{EntryTag, FolderListing, RemoteEntry};
pub use errors::DomainError;
pub use record::{file_type_of, MediaKind, SyncRecord, UNKNOWN_FILE_TYPE};
