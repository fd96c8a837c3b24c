use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One catalog record as held in memory.
/// `updated_at` is always a normalized instant, never a store-native handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Store-assigned identifier
    pub id: EntryId,

    pub title: String,

    /// Episode number (never negative)
    pub episode: u32,

    /// Link to the series, not validated
    pub link: String,

    /// Hidden from guests when set
    #[serde(default)]
    pub is_mature: bool,

    /// Last write timestamp assigned by the store
    pub updated_at: DateTime<Utc>,
}

/// The writable fields of an entry, as submitted for add/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub title: String,
    pub episode: u32,
    pub link: String,
    #[serde(default)]
    pub is_mature: bool,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, episode: u32, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episode,
            link: link.into(),
            is_mature: false,
        }
    }

    pub fn mature(mut self, is_mature: bool) -> Self {
        self.is_mature = is_mature;
        self
    }
}

impl Entry {
    /// Build an entry from a draft once the store has assigned id and timestamp
    pub fn from_draft(id: EntryId, draft: EntryDraft, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            episode: draft.episode,
            link: draft.link,
            is_mature: draft.is_mature,
            updated_at,
        }
    }

    /// Overwrite the writable fields, keeping the id
    pub fn apply(&mut self, draft: EntryDraft, updated_at: DateTime<Utc>) {
        self.title = draft.title;
        self.episode = draft.episode;
        self.link = draft.link;
        self.is_mature = draft.is_mature;
        self.updated_at = updated_at;
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ep. {})", self.title, self.episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_id() {
        let mut entry = Entry::from_draft(
            EntryId::from("abc"),
            EntryDraft::new("Alpha", 1, "https://example.com/alpha"),
            Utc::now(),
        );
        entry.apply(EntryDraft::new("Beta", 4, "https://example.com/beta").mature(true), Utc::now());

        assert_eq!(entry.id.as_str(), "abc");
        assert_eq!(entry.title, "Beta");
        assert_eq!(entry.episode, 4);
        assert!(entry.is_mature);
    }

    #[test]
    fn test_missing_mature_flag_defaults_to_false() {
        let json = r#"{"id":"x","title":"A","episode":2,"link":"u","updatedAt":"2024-01-01T00:00:00Z"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_mature);
    }
}
