// Read-only projections over a list of entries (search, home page).

use regex::RegexBuilder;

use super::entry::Entry;

/// Number of entries shown in the "recently updated" list
pub const RECENT_LIMIT: usize = 5;

/// Case-insensitive substring match on title. An empty query matches everything.
pub fn search<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&needle))
        .collect()
}

/// Most recently updated entry
pub fn latest(entries: &[Entry]) -> Option<&Entry> {
    entries.iter().max_by_key(|e| e.updated_at)
}

/// Up to `limit` entries, newest first
pub fn recent(entries: &[Entry], limit: usize) -> Vec<&Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSegment {
    pub text: String,
    pub matched: bool,
}

/// Splits `text` into matched / unmatched runs of `query` (case-insensitive).
/// The query is treated literally.
pub fn highlight(text: &str, query: &str) -> Vec<HighlightSegment> {
    let plain = || {
        vec![HighlightSegment {
            text: text.to_string(),
            matched: false,
        }]
    };

    if query.trim().is_empty() {
        return plain();
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Could not build highlight pattern for {:?}: {}", query, e);
            return plain();
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for m in pattern.find_iter(text) {
        if m.start() > cursor {
            segments.push(HighlightSegment {
                text: text[cursor..m.start()].to_string(),
                matched: false,
            });
        }
        segments.push(HighlightSegment {
            text: m.as_str().to_string(),
            matched: true,
        });
        cursor = m.end();
    }
    if cursor < text.len() {
        segments.push(HighlightSegment {
            text: text[cursor..].to_string(),
            matched: false,
        });
    }

    segments
}
