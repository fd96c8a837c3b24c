// src/events/mod.rs
//
// Internal Event System - Public API

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Catalog
    CatalogImported,
    CatalogReloaded,
    EntryAdded,
    EntryDeleted,
    EntryUpdated,
    // Identity
    PrincipalChanged,
};

pub use bus::{EventBus, EventLogEntry, SubscriptionId};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
