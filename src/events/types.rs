// events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EntryId, Principal};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($ty:ident) => {
        impl DomainEvent for $ty {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { stringify!($ty) }
        }
    };
}

// ============================================================================
// IDENTITY EVENTS
// ============================================================================

/// Emitted whenever the current principal changes (sign-in, guest, sign-out, expiry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// None when signed out
    pub principal: Option<Principal>,
}

impl PrincipalChanged {
    pub fn new(principal: Option<Principal>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            principal,
        }
    }
}

impl_domain_event!(PrincipalChanged);

// ============================================================================
// CATALOG EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub entry_id: EntryId,
    pub title: String,
}

impl EntryAdded {
    pub fn new(entry_id: EntryId, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            entry_id,
            title,
        }
    }
}

impl_domain_event!(EntryAdded);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub entry_id: EntryId,
    pub title: String,
}

impl EntryUpdated {
    pub fn new(entry_id: EntryId, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            entry_id,
            title,
        }
    }
}

impl_domain_event!(EntryUpdated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub entry_id: EntryId,
}

impl EntryDeleted {
    pub fn new(entry_id: EntryId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            entry_id,
        }
    }
}

impl_domain_event!(EntryDeleted);

/// Emitted after a bulk import has been written by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogImported {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub imported: usize,
}

impl CatalogImported {
    pub fn new(imported: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            imported,
        }
    }
}

impl_domain_event!(CatalogImported);

/// Emitted after the full collection has been replaced from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReloaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub total: usize,
    pub visible: usize,
}

impl CatalogReloaded {
    pub fn new(total: usize, visible: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            total,
            visible,
        }
    }
}

impl_domain_event!(CatalogReloaded);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(PrincipalChanged::new(None).event_type(), "PrincipalChanged");
        assert_eq!(CatalogImported::new(3).event_type(), "CatalogImported");
        assert_eq!(
            EntryDeleted::new(EntryId::from("x")).event_type(),
            "EntryDeleted"
        );
    }

    #[test]
    fn test_events_get_distinct_ids() {
        let a = EntryAdded::new(EntryId::from("1"), "A".to_string());
        let b = EntryAdded::new(EntryId::from("1"), "A".to_string());
        assert_ne!(a.event_id(), b.event_id());
    }
}
