// src/catalog/import.rs
//
// Bulk-import payloads: parsing, episode coercion, batch checks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    ensure_unique_title, normalized_title, validate_draft, DomainError, DomainResult, Entry,
    EntryDraft,
};

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// One object of an import file. `episode` is coerced later, `isMature` may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub title: String,
    pub episode: Value,
    pub link: String,
    #[serde(default, rename = "isMature", alias = "isNSFW")]
    pub is_mature: Option<bool>,
}

impl ImportRecord {
    pub fn new(title: impl Into<String>, episode: impl Into<Value>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episode: episode.into(),
            link: link.into(),
            is_mature: None,
        }
    }

    /// Coerce to a draft: integer episode, `is_mature` defaulting to false
    pub fn into_draft(self) -> DomainResult<EntryDraft> {
        let episode = coerce_episode(&self.episode).ok_or_else(|| {
            DomainError::InvalidImport(format!("Invalid episode for \"{}\"", self.title))
        })?;

        let draft = EntryDraft {
            title: self.title,
            episode,
            link: self.link,
            is_mature: self.is_mature.unwrap_or(false),
        };
        validate_draft(&draft)?;
        Ok(draft)
    }
}

/// Parse the contents of an import file: a JSON array of objects
pub fn parse_import(contents: &str) -> DomainResult<Vec<ImportRecord>> {
    serde_json::from_str::<Vec<ImportRecord>>(contents).map_err(|e| {
        log::warn!("Rejected import payload: {}", e);
        DomainError::InvalidImport(INVALID_JSON_MESSAGE.to_string())
    })
}

/// Integer coercion for episode values.
///
/// Numbers are truncated; strings take their leading digits ("12", " 7 ", "3rd").
/// Negative, empty, or non-numeric input yields None.
pub fn coerce_episode(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok();
            }
            let f = n.as_f64()?;
            if f.is_finite() && f >= 0.0 && f <= u32::MAX as f64 {
                Some(f.trunc() as u32)
            } else {
                None
            }
        }
        Value::String(s) => {
            let s = s.trim_start();
            let s = s.strip_prefix('+').unwrap_or(s);
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return None;
            }
            digits.parse::<u32>().ok()
        }
        _ => None,
    }
}

/// Convert every record, failing on the first bad one. An empty list is fine.
pub fn into_drafts(records: Vec<ImportRecord>) -> DomainResult<Vec<EntryDraft>> {
    records.into_iter().map(ImportRecord::into_draft).collect()
}

/// Title uniqueness for a whole batch, inside itself and against `existing`
pub fn ensure_batch_unique(existing: &[Entry], drafts: &[EntryDraft]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for draft in drafts {
        if !seen.insert(normalized_title(&draft.title)) {
            return Err(DomainError::DuplicateTitle(draft.title.trim().to_string()));
        }
        ensure_unique_title(existing, &draft.title, None)?;
    }
    Ok(())
}
