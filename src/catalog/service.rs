// src/catalog/service.rs
//
// Catalog service - the only component that talks to the document store.
//
// Every mutation follows the same shape:
//   clear error -> loading -> validate -> store write -> merge -> sort -> refilter -> outcome
//
// Mutations are serialized through `dispatch`, so each one validates against
// the state left by the previous one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::import::{ensure_batch_unique, into_drafts, ImportRecord};
use super::outcome::MutationOutcome;
use super::state::CatalogState;
use super::timestamp::{normalize_record, normalize_timestamp};
use crate::domain::{
    ensure_unique_title, validate_draft, Entry, EntryDraft, EntryId, Principal, Session,
};
use crate::error::{AppResult, ErrorResponse};
use crate::events::{
    CatalogImported, CatalogReloaded, EntryAdded, EntryDeleted, EntryUpdated, EventBus,
    SubscriptionId,
};
use crate::identity::IdentityProvider;
use crate::store::{DocumentStore, RecordFilter};

pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load catalog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Reject imports whose titles repeat inside the batch or match existing entries
    pub reject_duplicate_imports: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            reject_duplicate_imports: true,
        }
    }
}

pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    event_bus: Arc<EventBus>,
    state: Arc<RwLock<CatalogState>>,
    dispatch: tokio::sync::Mutex<()>,
    started: AtomicBool,
    subscription: Mutex<Option<(Arc<dyn IdentityProvider>, SubscriptionId)>>,
    options: CatalogOptions,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        event_bus: Arc<EventBus>,
        options: CatalogOptions,
    ) -> Self {
        Self {
            store,
            event_bus,
            state: Arc::new(RwLock::new(CatalogState::default())),
            dispatch: tokio::sync::Mutex::new(()),
            started: AtomicBool::new(false),
            subscription: Mutex::new(None),
            options,
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Binds visibility to `identity` and performs the initial load.
    ///
    /// Runs once per service; later calls return false and do nothing.
    pub async fn start(&self, identity: Arc<dyn IdentityProvider>) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            log::debug!("Catalog already started");
            return false;
        }

        let session = Session::for_principal(identity.current_principal().as_ref());
        self.write_state().set_show_mature(session.show_mature);

        let state = Arc::clone(&self.state);
        let id = identity.subscribe(Box::new(move |principal: Option<&Principal>| {
            let session = Session::for_principal(principal);
            state
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .set_show_mature(session.show_mature);
        }));
        *self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((identity, id));

        self.reload().await;
        true
    }

    /// Drops the identity subscription
    pub fn shutdown(&self) {
        let taken = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some((identity, id)) = taken {
            identity.unsubscribe(id);
            log::debug!("Catalog detached from identity changes");
        }
    }

    /// Local refilter only, never fetches
    pub fn set_show_mature(&self, show_mature: bool) {
        self.write_state().set_show_mature(show_mature);
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    /// Full collection, title order
    pub fn entries(&self) -> Vec<Entry> {
        self.read_state().entries().to_vec()
    }

    /// Collection filtered for the current visibility
    pub fn visible(&self) -> Vec<Entry> {
        self.read_state().visible().to_vec()
    }

    pub fn show_mature(&self) -> bool {
        self.read_state().show_mature()
    }

    /// Advisory busy flag; callers disable their triggers while it is set
    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Replace the full collection from the store.
    ///
    /// On failure the previous collection stays and the error slot is set.
    pub async fn reload(&self) -> bool {
        let _dispatch = self.dispatch.lock().await;
        self.begin();
        let loaded = self.reload_locked().await;
        self.write_state().loading = false;
        loaded
    }

    pub async fn add(&self, draft: EntryDraft) -> MutationOutcome {
        let _dispatch = self.dispatch.lock().await;
        self.begin();
        let result = self.add_locked(draft).await;
        self.finish(result, "Failed to add entry")
    }

    pub async fn update(&self, id: &EntryId, draft: EntryDraft) -> MutationOutcome {
        let _dispatch = self.dispatch.lock().await;
        self.begin();
        let result = self.update_locked(id, draft).await;
        self.finish(result, "Failed to update entry")
    }

    pub async fn delete(&self, id: &EntryId) -> MutationOutcome {
        let _dispatch = self.dispatch.lock().await;
        self.begin();
        let result = self.delete_locked(id).await;
        self.finish(result, "Failed to delete entry")
    }

    /// Writes every record in one batch, then reloads the whole collection.
    pub async fn bulk_import(&self, records: Vec<ImportRecord>) -> MutationOutcome {
        let _dispatch = self.dispatch.lock().await;
        self.begin();
        let result = self.bulk_import_locked(records).await;
        self.finish(result, "Failed to import entries")
    }

    async fn reload_locked(&self) -> bool {
        match self.store.query_all(RecordFilter::All).await {
            Ok(records) => {
                let entries: Vec<Entry> = records.into_iter().map(normalize_record).collect();
                let (total, visible) = {
                    let mut state = self.write_state();
                    state.replace_entries(entries);
                    (state.entries().len(), state.visible().len())
                };
                log::info!("Loaded {} entries ({} visible)", total, visible);
                self.event_bus.emit(CatalogReloaded::new(total, visible));
                true
            }
            Err(err) => {
                log::error!("{}: {}", LOAD_FAILURE_MESSAGE, err);
                self.write_state().error = Some(LOAD_FAILURE_MESSAGE.to_string());
                false
            }
        }
    }

    async fn add_locked(&self, draft: EntryDraft) -> AppResult<String> {
        validate_draft(&draft)?;
        ensure_unique_title(self.read_state().entries(), &draft.title, None)?;

        let receipt = self.store.insert(&draft).await?;
        let updated_at = normalize_timestamp(receipt.updated_at.as_ref());
        let entry = Entry::from_draft(receipt.id, draft, updated_at);

        let (id, title) = (entry.id.clone(), entry.title.clone());
        self.write_state().push(entry);
        self.event_bus.emit(EntryAdded::new(id, title));

        Ok("Entry added".to_string())
    }

    async fn update_locked(&self, id: &EntryId, draft: EntryDraft) -> AppResult<String> {
        validate_draft(&draft)?;
        ensure_unique_title(self.read_state().entries(), &draft.title, Some(id))?;

        let stamp = self.store.update(id, &draft).await?;
        let updated_at = normalize_timestamp(stamp.as_ref());

        let title = draft.title.clone();
        let held = self
            .write_state()
            .modify(id, |entry| entry.apply(draft, updated_at));
        if !held {
            log::warn!("Updated entry {} is not in the local collection", id);
        }
        self.event_bus.emit(EntryUpdated::new(id.clone(), title));

        Ok("Entry updated".to_string())
    }

    async fn delete_locked(&self, id: &EntryId) -> AppResult<String> {
        self.store.delete(id).await?;

        if !self.write_state().remove(id) {
            log::debug!("Deleted entry {} was not held locally", id);
        }
        self.event_bus.emit(EntryDeleted::new(id.clone()));

        Ok("Entry deleted".to_string())
    }

    async fn bulk_import_locked(&self, records: Vec<ImportRecord>) -> AppResult<String> {
        let drafts = into_drafts(records)?;
        if drafts.is_empty() {
            log::info!("Import file held no entries");
            return Ok("0 entries imported".to_string());
        }
        if self.options.reject_duplicate_imports {
            ensure_batch_unique(self.read_state().entries(), &drafts)?;
        }

        let count = self.store.batch_insert(&drafts).await?;
        self.event_bus.emit(CatalogImported::new(count));

        // ids of the new records are unknown here, so refetch everything
        self.reload_locked().await;

        Ok(format!("{} entries imported", count))
    }

    // ========================================================================
    // STATE HELPERS
    // ========================================================================

    fn begin(&self) {
        let mut state = self.write_state();
        state.error = None;
        state.loading = true;
    }

    fn finish(&self, result: AppResult<String>, fallback: &str) -> MutationOutcome {
        let outcome = match result {
            Ok(message) => {
                log::info!("{}", message);
                MutationOutcome::ok(message)
            }
            Err(err) => {
                let response = ErrorResponse::from_app_error(&err, fallback);
                self.write_state().error = Some(response.message.clone());
                MutationOutcome::fail(response.message)
            }
        };
        self.write_state().loading = false;
        outcome
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CatalogService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
