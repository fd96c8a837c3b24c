// src/identity/local.rs
//
// In-process identity: sign in, guest mode, sign out.
// Every change is published as PrincipalChanged.

use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use super::{IdentityProvider, PrincipalListener};
use crate::domain::Principal;
use crate::events::{EventBus, PrincipalChanged, SubscriptionId};

pub struct LocalIdentity {
    current: RwLock<Option<Principal>>,
    event_bus: Arc<EventBus>,
}

impl LocalIdentity {
    /// Starts signed out
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            current: RwLock::new(None),
            event_bus,
        }
    }

    pub fn sign_in(&self, display_name: impl Into<String>) -> Principal {
        let principal = Principal::full(Uuid::new_v4().to_string(), Some(display_name.into()));
        log::info!("Signed in as {:?}", principal.display_name);
        self.set(Some(principal.clone()));
        principal
    }

    pub fn sign_in_as_guest(&self) -> Principal {
        let principal = Principal::guest(Uuid::new_v4().to_string());
        log::info!("Signed in as guest");
        self.set(Some(principal.clone()));
        principal
    }

    pub fn sign_out(&self) {
        log::info!("Signed out");
        self.set(None);
    }

    /// Session ended by the provider rather than the user
    pub fn expire(&self) {
        log::warn!("Session expired");
        self.set(None);
    }

    fn set(&self, principal: Option<Principal>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = principal.clone();
        self.event_bus.emit(PrincipalChanged::new(principal));
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_principal(&self) -> Option<Principal> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self, listener: PrincipalListener) -> SubscriptionId {
        self.event_bus
            .subscribe::<PrincipalChanged, _>(move |event| listener(event.principal.as_ref()))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_bus.unsubscribe(id)
    }
}
