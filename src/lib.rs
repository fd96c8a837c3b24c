// src/lib.rs
// ComicHub - Local-first comic catalog manager
//
// Architecture:
// - Domain-centric: invariants live in the domain, checked before any store write
// - Event-driven: catalog and identity changes go through the event bus
// - Explicit: the store is injected, never a global
// - One authoritative collection; the visible one is always derived

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod logging;
pub mod store;

// ============================================================================
// CORE
// ============================================================================

pub mod catalog;
pub mod identity;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    ensure_unique_title,
    highlight,
    latest,
    normalized_title,
    recent,
    search,
    validate_draft,
    DomainError,
    // Entry
    Entry,
    EntryDraft,
    EntryId,
    HighlightSegment,
    // Principal
    Principal,
    Session,
};

// ============================================================================
// PUBLIC API - Errors
// ============================================================================

pub use error::{AppError, AppResult, ErrorKind, ErrorResponse};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    CatalogImported,
    CatalogReloaded,
    DomainEvent,
    EntryAdded,
    EntryDeleted,
    EntryUpdated,
    EventBus,
    EventLogEntry,
    PrincipalChanged,
    SubscriptionId,
};

// ============================================================================
// PUBLIC API - Store & Database
// ============================================================================

pub use db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};
pub use store::{
    DocumentStore, InMemoryDocumentStore, RawRecord, RawTimestamp, RecordFilter,
    SqliteDocumentStore, StoreTimestamp,
};

// ============================================================================
// PUBLIC API - Catalog & Identity
// ============================================================================

pub use catalog::{
    normalize_timestamp, parse_import, CatalogOptions, CatalogService, CatalogState,
    ImportRecord, MutationOutcome,
};
pub use identity::{IdentityProvider, LocalIdentity};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, CatalogController, EntryForm, Notification, Notifier};

pub use config::{load_config, AppConfig};
