// src/store/mod.rs
//
// Document store layer
//
// RULES:
// - Stores are DUMB record holders
// - NO uniqueness or visibility rules (those live in the catalog)
// - Every write is stamped by the store
// - Records leave the store raw; the catalog normalizes them

pub mod document_store;
pub mod memory_store;
pub mod sqlite_store;

pub use document_store::{
    DocumentStore, InsertReceipt, RawRecord, RawTimestamp, RecordFilter, StoreTimestamp,
};
pub use memory_store::{InMemoryDocumentStore, StoreOp, TimestampStyle};
pub use sqlite_store::SqliteDocumentStore;

#[cfg(test)]
pub use document_store::MockDocumentStore;
