//! Entry invariants:
//!
//! 1. Identity is assigned by the store and never changes
//! 2. Title and link cannot be empty
//! 3. No two entries share a trimmed, case-folded title
//! 4. Collections of entries are kept in title order

pub mod entity;
pub mod invariants;

pub use entity::{Entry, EntryDraft, EntryId};
pub use invariants::{
    collation_key, ensure_unique_title, normalized_title, sort_entries, title_order,
    validate_draft,
};
