//! Port definitions
//!
//! Ports are the interfaces the sync core depends on; adapter crates
//! provide the implementations.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - Listing folders and resolving temporary links (Dropbox)
//! - [`IRecordTable`] - Looking up and creating rows (Airtable)

pub mod record_table;
pub mod remote_store;

pub use record_table::{CreatedRecord, IRecordTable};
pub use remote_store::IRemoteStore;
