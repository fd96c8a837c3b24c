// src/application/commands/entry_commands.rs
//
// Entry Command Handlers
//
// RULES:
// - Accept DTOs / plain strings
// - Go through the controller for anything that writes
// - Return DTOs or outcomes
// - Never contain business logic

use std::path::Path;

use crate::application::{
    dto::{EntryDto, SearchHitDto, UpdateEntryDto},
    form::EntryForm,
    state::AppState,
};
use crate::catalog::MutationOutcome;
use crate::domain::{highlight, latest, recent, search, EntryId};

/// Visible entries matching `query` (all of them without one), title order
pub fn list_entries(state: &AppState, query: Option<&str>) -> Vec<SearchHitDto> {
    let visible = state.catalog.visible();
    let query = query.unwrap_or("");

    search(&visible, query)
        .into_iter()
        .map(|entry| SearchHitDto {
            segments: highlight(&entry.title, query)
                .into_iter()
                .map(Into::into)
                .collect(),
            entry: EntryDto::from(entry.clone()),
        })
        .collect()
}

/// Newest visible entries first
pub fn recent_entries(state: &AppState, limit: usize) -> Vec<EntryDto> {
    let visible = state.catalog.visible();
    recent(&visible, limit)
        .into_iter()
        .cloned()
        .map(EntryDto::from)
        .collect()
}

/// Newest visible entry, if any
pub fn latest_entry(state: &AppState) -> Option<EntryDto> {
    let visible = state.catalog.visible();
    latest(&visible).cloned().map(EntryDto::from)
}

pub async fn add_entry(state: &AppState, form: EntryForm) -> MutationOutcome {
    state.controller.save(None, form).await
}

/// Update an entry; fields left out of `changes` keep their current value
pub async fn update_entry(
    state: &AppState,
    entry_id: String,
    changes: UpdateEntryDto,
) -> MutationOutcome {
    let id = EntryId::new(entry_id);

    let current = match state.controller.edit(&id) {
        Some(form) => form,
        None => {
            return state
                .controller
                .notifier()
                .current()
                .map(|n| MutationOutcome::fail(n.message))
                .unwrap_or_else(|| MutationOutcome::fail(format!("Entry not found: {}", id)))
        }
    };

    let form = EntryForm {
        title: changes.title.unwrap_or(current.title),
        episode: changes.episode.unwrap_or(current.episode),
        link: changes.link.unwrap_or(current.link),
        is_mature: changes.is_mature.unwrap_or(current.is_mature),
    };

    state.controller.save(Some(&id), form).await
}

pub async fn delete_entry(state: &AppState, entry_id: String) -> MutationOutcome {
    state.controller.delete(&EntryId::new(entry_id)).await
}

pub async fn import_entries(state: &AppState, path: &Path) -> MutationOutcome {
    state.controller.import_file(path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::{CatalogController, Notifier};
    use crate::catalog::{CatalogOptions, CatalogService};
    use crate::events::EventBus;
    use crate::identity::LocalIdentity;
    use crate::store::{InMemoryDocumentStore, RawRecord, RawTimestamp};

    fn record(id: &str, title: &str, mature: bool, stamp: &str) -> RawRecord {
        RawRecord {
            id: EntryId::from(id),
            title: title.to_string(),
            episode: 1,
            link: "https://example.com".to_string(),
            is_mature: mature,
            updated_at: Some(RawTimestamp::Text(stamp.to_string())),
        }
    }

    async fn app_state() -> AppState {
        let store = InMemoryDocumentStore::new();
        store.seed(record("1", "Akira", false, "2024-01-01T00:00:00Z"));
        store.seed(record("2", "Berserk", false, "2024-03-01T00:00:00Z"));
        store.seed(record("3", "Gantz", true, "2024-05-01T00:00:00Z"));

        let event_bus = Arc::new(EventBus::new());
        let identity = Arc::new(LocalIdentity::new(event_bus.clone()));
        identity.sign_in("Editor");
        let catalog = Arc::new(CatalogService::new(
            Arc::new(store),
            event_bus.clone(),
            CatalogOptions::default(),
        ));
        catalog.start(identity.clone()).await;
        let controller = Arc::new(CatalogController::new(
            catalog.clone(),
            identity.clone(),
            Arc::new(Notifier::default()),
        ));

        AppState {
            event_bus,
            identity,
            catalog,
            controller,
        }
    }

    #[tokio::test]
    async fn test_latest_follows_visibility() {
        let state = app_state().await;
        assert_eq!(latest_entry(&state).map(|e| e.title), Some("Gantz".to_string()));

        state.identity.sign_in_as_guest();
        assert_eq!(latest_entry(&state).map(|e| e.title), Some("Berserk".to_string()));

        let recent: Vec<String> = recent_entries(&state, 5).into_iter().map(|e| e.title).collect();
        assert_eq!(recent, vec!["Berserk", "Akira"]);
    }
}
