//! Integration tests for dropsync-dropbox
//!
//! Uses wiremock to simulate the Dropbox RPC API and verifies end-to-end
//! behavior of the client: pagination, retries and temporary links.

mod common;

mod test_links;
mod test_listing;
