// src/identity/mod.rs
//
// Identity collaborator
//
// The catalog only needs the current principal and change notifications.
// How a principal is obtained (OAuth, anonymous sessions) is not modeled here.

pub mod local;

pub use local::LocalIdentity;

use crate::domain::Principal;
use crate::events::SubscriptionId;

/// Called with the new principal (None when signed out)
pub type PrincipalListener = Box<dyn Fn(Option<&Principal>) + Send + Sync>;

pub trait IdentityProvider: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;

    fn subscribe(&self, listener: PrincipalListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
