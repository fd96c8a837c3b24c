use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::entity::{Entry, EntryDraft, EntryId};
use crate::domain::{DomainError, DomainResult};

/// Key used for title uniqueness: trimmed and case-folded
pub fn normalized_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Validates the fields of a draft before it is sent anywhere
pub fn validate_draft(draft: &EntryDraft) -> DomainResult<()> {
    if draft.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Title cannot be empty".to_string(),
        ));
    }
    if draft.link.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Link cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Rejects `title` if any entry other than `exclude` already uses it.
/// Checks the full collection, not only what is visible.
pub fn ensure_unique_title(
    entries: &[Entry],
    title: &str,
    exclude: Option<&EntryId>,
) -> DomainResult<()> {
    let key = normalized_title(title);
    let clash = entries
        .iter()
        .filter(|e| Some(&e.id) != exclude)
        .any(|e| normalized_title(&e.title) == key);

    if clash {
        return Err(DomainError::DuplicateTitle(title.trim().to_string()));
    }
    Ok(())
}

/// Sort key for titles: decomposed, accents dropped, case-folded.
/// "Éclair" sorts with the E's, not after "Z".
pub fn collation_key(title: &str) -> String {
    title
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Accent- and case-insensitive comparison with a raw tiebreak so the order is total
pub fn title_order(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| title_order(&a.title, &b.title));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str, title: &str) -> Entry {
        Entry::from_draft(EntryId::from(id), EntryDraft::new(title, 1, "u"), Utc::now())
    }

    #[test]
    fn test_duplicate_ignores_case_and_whitespace() {
        let entries = vec![entry("1", "Alpha")];
        let result = ensure_unique_title(&entries, "  alpha ", None);
        assert!(matches!(result, Err(DomainError::DuplicateTitle(_))));
    }

    #[test]
    fn test_entry_may_keep_its_own_title() {
        let entries = vec![entry("1", "Alpha"), entry("2", "Beta")];
        let own = EntryId::from("1");
        assert!(ensure_unique_title(&entries, "ALPHA", Some(&own)).is_ok());
        assert!(ensure_unique_title(&entries, "beta", Some(&own)).is_err());
    }

    #[test]
    fn test_empty_fields_fail() {
        assert!(validate_draft(&EntryDraft::new("   ", 1, "u")).is_err());
        assert!(validate_draft(&EntryDraft::new("A", 1, "")).is_err());
        assert!(validate_draft(&EntryDraft::new("A", 0, "u")).is_ok());
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut entries = vec![entry("1", "charlie"), entry("2", "Bravo"), entry("3", "alpha")];
        sort_entries(&mut entries);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha", "Bravo", "charlie"]);
    }

    #[test]
    fn test_accented_titles_sort_with_their_base_letter() {
        let mut entries = vec![
            entry("1", "Zeta"),
            entry("2", "Éclair"),
            entry("3", "Ōkami"),
            entry("4", "Akira"),
            entry("5", "eclair"),
        ];
        sort_entries(&mut entries);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Akira", "eclair", "Éclair", "Ōkami", "Zeta"]);
    }

    #[test]
    fn test_collation_key_folds_accents_and_case() {
        assert_eq!(collation_key(" Ōkami "), "okami");
        assert_eq!(collation_key("ÉCLAIR"), collation_key("eclair"));
        assert_eq!(title_order("Éclair", "eclair"), "Éclair".cmp("eclair"));
    }
}
