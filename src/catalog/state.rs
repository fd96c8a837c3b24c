use crate::domain::{sort_entries, Entry, EntryId};

/// Pure visibility filter: mature entries only when `show_mature`
pub fn visible_entries(entries: &[Entry], show_mature: bool) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| show_mature || !e.is_mature)
        .cloned()
        .collect()
}

/// In-memory view owned by the catalog.
///
/// `entries` is the single authoritative collection; `visible` is always
/// recomputed from it and never mutated on its own.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    entries: Vec<Entry>,
    visible: Vec<Entry>,
    show_mature: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn visible(&self) -> &[Entry] {
        &self.visible
    }

    pub fn show_mature(&self) -> bool {
        self.show_mature
    }

    pub fn replace_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.resort();
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.resort();
    }

    /// Applies `f` to the entry with `id`; false if it is not held
    pub fn modify<F>(&mut self, id: &EntryId, f: F) -> bool
    where
        F: FnOnce(&mut Entry),
    {
        let found = match self.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        };
        if found {
            self.resort();
        }
        found
    }

    pub fn remove(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.refilter();
        }
        removed
    }

    pub fn set_show_mature(&mut self, show_mature: bool) {
        if self.show_mature != show_mature {
            self.show_mature = show_mature;
            self.refilter();
        }
    }

    fn resort(&mut self) {
        sort_entries(&mut self.entries);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = visible_entries(&self.entries, self.show_mature);
    }
}
