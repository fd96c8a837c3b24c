// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod entry;
pub mod principal;
pub mod views;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Entry Domain
pub use entry::{
    collation_key, ensure_unique_title, normalized_title, sort_entries, title_order,
    validate_draft, Entry, EntryDraft, EntryId,
};

// Principal / Session (derived visibility)
pub use principal::{Principal, Session};

// Derived views
pub use views::{highlight, latest, recent, search, HighlightSegment, RECENT_LIMIT};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These are raised locally, before any store call
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvariantViolation(String),

    #[error("Title already exists: {0}")]
    DuplicateTitle(String),

    #[error("{0}")]
    InvalidImport(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
