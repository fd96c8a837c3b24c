// src/application/form.rs
//
// Add / edit form boundary. Everything arrives as text; the draft leaves typed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::coerce_episode;
use crate::domain::{DomainError, DomainResult, Entry, EntryDraft};

pub const REQUIRED_FIELDS_MESSAGE: &str = "All fields are required";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    pub title: String,
    pub episode: String,
    pub link: String,
    #[serde(default)]
    pub is_mature: bool,
}

impl EntryForm {
    pub fn new(
        title: impl Into<String>,
        episode: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            episode: episode.into(),
            link: link.into(),
            is_mature: false,
        }
    }

    pub fn mature(mut self, is_mature: bool) -> Self {
        self.is_mature = is_mature;
        self
    }

    /// Prefill for editing an existing entry
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            episode: entry.episode.to_string(),
            link: entry.link.clone(),
            is_mature: entry.is_mature,
        }
    }

    pub fn into_draft(self) -> DomainResult<EntryDraft> {
        if [&self.title, &self.episode, &self.link]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(DomainError::InvariantViolation(
                REQUIRED_FIELDS_MESSAGE.to_string(),
            ));
        }

        let episode = coerce_episode(&Value::String(self.episode.clone())).ok_or_else(|| {
            DomainError::InvariantViolation(format!(
                "Episode must be a whole number: {}",
                self.episode.trim()
            ))
        })?;

        Ok(EntryDraft::new(self.title, episode, self.link).mature(self.is_mature))
    }
}
