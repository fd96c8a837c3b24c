// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// - DTOs are output-friendly, flat and serializable
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::domain::{Entry, HighlightSegment};

// ============================================================================
// ENTRY DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDto {
    pub id: String,
    pub title: String,
    pub episode: u32,
    pub link: String,
    pub is_mature: bool,
    pub updated_at: String,
}

/// Search hit with the matched parts of the title marked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHitDto {
    pub entry: EntryDto,
    pub segments: Vec<SegmentDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDto {
    pub text: String,
    pub matched: bool,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryDto {
    pub title: Option<String>,
    pub episode: Option<String>,
    pub link: Option<String>,
    pub is_mature: Option<bool>,
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

impl From<Entry> for EntryDto {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title,
            episode: entry.episode,
            link: entry.link,
            is_mature: entry.is_mature,
            updated_at: entry.updated_at.to_rfc3339(),
        }
    }
}

impl From<HighlightSegment> for SegmentDto {
    fn from(segment: HighlightSegment) -> Self {
        Self {
            text: segment.text,
            matched: segment.matched,
        }
    }
}
