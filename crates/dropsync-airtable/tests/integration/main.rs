//! Integration tests for dropsync-airtable
//!
//! Uses wiremock to simulate the Airtable REST API and verifies record
//! creation, duplicate lookups and retry behavior.

mod common;

mod test_lookup;
mod test_records;
