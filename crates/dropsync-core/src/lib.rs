//! dropsync Core - Domain types and port definitions
//!
//! This crate contains the core of the Dropbox → Airtable synchronizer:
//! - **Domain types** - `RemoteEntry`, `SyncRecord`, `FolderListing`
//! - **Configuration** - typed YAML configuration with environment overlay
//! - **Retry policy** - the bounded backoff schedule shared by both adapters
//! - **Port definitions** - `IRemoteStore` and `IRecordTable`, implemented by
//!   the adapter crates
//!
//! # Architecture
//!
//! Adapter crates (`dropsync-dropbox`, `dropsync-airtable`) implement the
//! ports defined here. The sync crate depends only on these traits, which
//! keeps the orchestration logic testable with in-memory fakes.

pub mod config;
pub mod domain;
pub mod ports;
pub mod retry;
