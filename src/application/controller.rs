// src/application/controller.rs
//
// Access-control gate between the user-facing surface and the catalog.
//
// RULES:
// - Check the principal before dispatching any mutation
// - A rejected call never reaches the catalog or the store
// - Every outcome is posted as a notification

use std::path::Path;
use std::sync::Arc;

use super::form::EntryForm;
use super::notification::Notifier;
use crate::catalog::{parse_import, CatalogService, MutationOutcome};
use crate::domain::{EntryId, Session};
use crate::error::{AppError, ErrorResponse};
use crate::identity::IdentityProvider;

pub const GUEST_EDIT_MESSAGE: &str = "Guest mode cannot edit entries";
pub const GUEST_SAVE_MESSAGE: &str = "Guest mode cannot add or edit entries";
pub const GUEST_DELETE_MESSAGE: &str = "Guest mode cannot delete entries";
pub const GUEST_IMPORT_MESSAGE: &str = "Guest mode cannot import entries";

pub struct CatalogController {
    catalog: Arc<CatalogService>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<Notifier>,
}

impl CatalogController {
    pub fn new(
        catalog: Arc<CatalogService>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            catalog,
            identity,
            notifier,
        }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session(&self) -> Session {
        Session::for_principal(self.identity.current_principal().as_ref())
    }

    /// Open an entry for editing. Returns the prefilled form.
    pub fn edit(&self, id: &EntryId) -> Option<EntryForm> {
        if let Some(rejected) = self.gate(GUEST_EDIT_MESSAGE) {
            log::debug!("Edit of {} rejected: {}", id, rejected.message);
            return None;
        }
        let form = self
            .catalog
            .entries()
            .iter()
            .find(|e| &e.id == id)
            .map(EntryForm::from_entry);
        if form.is_none() {
            self.notifier.error(format!("Entry not found: {}", id));
        }
        form
    }

    /// Add when `editing` is None, otherwise update that entry
    pub async fn save(&self, editing: Option<&EntryId>, form: EntryForm) -> MutationOutcome {
        if let Some(rejected) = self.gate(GUEST_SAVE_MESSAGE) {
            return rejected;
        }

        let draft = match form.into_draft() {
            Ok(draft) => draft,
            Err(err) => return self.reject(err.into()),
        };

        let outcome = match editing {
            Some(id) => self.catalog.update(id, draft).await,
            None => self.catalog.add(draft).await,
        };
        self.report(outcome)
    }

    pub async fn delete(&self, id: &EntryId) -> MutationOutcome {
        if let Some(rejected) = self.gate(GUEST_DELETE_MESSAGE) {
            return rejected;
        }
        let outcome = self.catalog.delete(id).await;
        self.report(outcome)
    }

    pub async fn import_json(&self, contents: &str) -> MutationOutcome {
        if let Some(rejected) = self.gate(GUEST_IMPORT_MESSAGE) {
            return rejected;
        }
        self.import_checked(contents).await
    }

    pub async fn import_file(&self, path: &Path) -> MutationOutcome {
        if let Some(rejected) = self.gate(GUEST_IMPORT_MESSAGE) {
            return rejected;
        }

        match tokio::fs::read_to_string(path).await {
            Ok(contents) => self.import_checked(&contents).await,
            Err(err) => {
                log::error!("Could not read {}: {}", path.display(), err);
                let outcome =
                    MutationOutcome::fail(format!("Could not read {}", path.display()));
                self.report(outcome)
            }
        }
    }

    async fn import_checked(&self, contents: &str) -> MutationOutcome {
        let records = match parse_import(contents) {
            Ok(records) => records,
            Err(err) => return self.reject(err.into()),
        };
        let outcome = self.catalog.bulk_import(records).await;
        self.report(outcome)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn gate(&self, message: &str) -> Option<MutationOutcome> {
        if self.session().can_edit {
            return None;
        }
        log::warn!("{}", message);
        let response = ErrorResponse::permission(message);
        Some(self.report(MutationOutcome::fail(response.message)))
    }

    fn reject(&self, error: AppError) -> MutationOutcome {
        let response = ErrorResponse::from_app_error(&error, "Invalid input");
        self.report(MutationOutcome::fail(response.message))
    }

    fn report(&self, outcome: MutationOutcome) -> MutationOutcome {
        self.notifier.report(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::form::REQUIRED_FIELDS_MESSAGE;
    use crate::application::notification::NotificationKind;
    use crate::catalog::{CatalogOptions, INVALID_JSON_MESSAGE};
    use crate::events::EventBus;
    use crate::identity::LocalIdentity;
    use crate::store::{InMemoryDocumentStore, StoreOp};
    use std::io::Write;

    struct Fixture {
        store: Arc<InMemoryDocumentStore>,
        identity: Arc<LocalIdentity>,
        controller: CatalogController,
    }

    async fn fixture() -> Fixture {
        let bus = Arc::new(EventBus::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        let identity = Arc::new(LocalIdentity::new(Arc::clone(&bus)));
        identity.sign_in("Editor");

        let catalog = Arc::new(CatalogService::new(
            store.clone(),
            bus,
            CatalogOptions::default(),
        ));
        catalog.start(identity.clone()).await;

        let controller =
            CatalogController::new(catalog, identity.clone(), Arc::new(Notifier::default()));
        Fixture {
            store,
            identity,
            controller,
        }
    }

    #[tokio::test]
    async fn test_save_adds_then_updates() {
        let f = fixture().await;

        let added = f
            .controller
            .save(None, EntryForm::new("Gantz", "10", "u"))
            .await;
        assert!(added.success);
        let id = f.controller.catalog().entries()[0].id.clone();

        let form = f.controller.edit(&id).unwrap();
        assert_eq!(form.episode, "10");

        let updated = f
            .controller
            .save(Some(&id), EntryForm { episode: "11".into(), ..form })
            .await;
        assert!(updated.success);
        assert_eq!(f.controller.catalog().entries()[0].episode, 11);
        assert_eq!(
            f.controller.notifier().current().unwrap().kind,
            NotificationKind::Success
        );
    }

    #[tokio::test]
    async fn test_guest_is_rejected_before_any_store_call() {
        let f = fixture().await;
        f.identity.sign_in_as_guest();
        let queries = f.store.call_count(StoreOp::QueryAll);

        let save = f.controller.save(None, EntryForm::new("T", "1", "u")).await;
        assert_eq!(save.message, GUEST_SAVE_MESSAGE);

        let delete = f.controller.delete(&EntryId::from("x")).await;
        assert_eq!(delete.message, GUEST_DELETE_MESSAGE);

        let import = f.controller.import_json("[]").await;
        assert_eq!(import.message, GUEST_IMPORT_MESSAGE);

        assert!(f.controller.edit(&EntryId::from("x")).is_none());
        assert_eq!(f.controller.notifier().current().unwrap().message, GUEST_EDIT_MESSAGE);

        assert_eq!(f.store.write_count(), 0);
        assert_eq!(f.store.call_count(StoreOp::QueryAll), queries);
        assert!(f.controller.catalog().last_error().is_none());
    }

    #[tokio::test]
    async fn test_signed_out_is_rejected_like_guest() {
        let f = fixture().await;
        f.identity.sign_out();

        let outcome = f.controller.save(None, EntryForm::new("T", "1", "u")).await;
        assert!(!outcome.success);
        assert_eq!(f.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_form_never_dispatches() {
        let f = fixture().await;
        let outcome = f.controller.save(None, EntryForm::new("T", "", "u")).await;
        assert_eq!(outcome.message, REQUIRED_FIELDS_MESSAGE);
        assert_eq!(f.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_json_import() {
        let f = fixture().await;
        let outcome = f.controller.import_json("{not json").await;
        assert_eq!(outcome.message, INVALID_JSON_MESSAGE);
        assert_eq!(f.store.write_count(), 0);
        assert_eq!(
            f.controller.notifier().current().unwrap().kind,
            NotificationKind::Error
        );
    }

    #[tokio::test]
    async fn test_import_file() {
        let f = fixture().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title":"Ajin","episode":"3","link":"u"}},{{"title":"Dorohedoro","episode":7,"link":"v","isMature":true}}]"#
        )
        .unwrap();

        let outcome = f.controller.import_file(file.path()).await;
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.message, "2 entries imported");

        let entries = f.controller.catalog().entries();
        assert_eq!(entries[0].episode, 3);
        assert!(entries[1].is_mature);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let f = fixture().await;
        let outcome = f
            .controller
            .import_file(Path::new("/definitely/not/here.json"))
            .await;
        assert!(!outcome.success);
        assert_eq!(f.store.write_count(), 0);
    }
}
