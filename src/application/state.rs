// src/application/state.rs

use std::sync::Arc;

use crate::application::CatalogController;
use crate::catalog::CatalogService;
use crate::events::EventBus;
use crate::identity::LocalIdentity;

/// Shared handles for command handlers.
/// Everything is built in main.rs and passed here.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub identity: Arc<LocalIdentity>,
    pub catalog: Arc<CatalogService>,
    pub controller: Arc<CatalogController>,
}
