// src/catalog/mod.rs
//
// Catalog core
//
// - Owns the in-memory collection (full + visible)
// - Validates invariants before any store write
// - Normalizes every record the moment it leaves the store
// - Reports every mutation as a MutationOutcome, never as an error

pub mod import;
pub mod outcome;
pub mod service;
pub mod state;
pub mod timestamp;

pub use import::{coerce_episode, parse_import, ImportRecord, INVALID_JSON_MESSAGE};
pub use outcome::MutationOutcome;
pub use service::{CatalogOptions, CatalogService, LOAD_FAILURE_MESSAGE};
pub use state::{visible_entries, CatalogState};
pub use timestamp::{normalize_record, normalize_timestamp};
