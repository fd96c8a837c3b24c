// src/catalog/timestamp.rs
//
// The only place that knows about store timestamp shapes.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::Entry;
use crate::store::{RawRecord, RawTimestamp};

/// Produce a canonical instant from whatever the store returned.
/// Absent or unreadable values become "now".
pub fn normalize_timestamp(raw: Option<&RawTimestamp>) -> DateTime<Utc> {
    let parsed = match raw {
        Some(RawTimestamp::Instant(dt)) => Some(*dt),
        Some(RawTimestamp::Native(handle)) => handle.to_date_time(),
        Some(RawTimestamp::Text(text)) => parse_text(text),
        None => None,
    };

    parsed.unwrap_or_else(|| {
        if raw.is_some() {
            log::debug!("Unrecognized store timestamp {:?}, using now", raw);
        }
        Utc::now()
    })
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // zone-less ISO strings are taken as UTC
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Convert a raw store record into an in-memory entry
pub fn normalize_record(record: RawRecord) -> Entry {
    let updated_at = normalize_timestamp(record.updated_at.as_ref());
    Entry {
        id: record.id,
        title: record.title,
        episode: record.episode,
        link: record.link,
        is_mature: record.is_mature,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryId;
    use crate::store::StoreTimestamp;
    use chrono::{Duration, TimeZone};

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 8, 30, 0).unwrap()
    }

    fn close_to_now(dt: DateTime<Utc>) -> bool {
        (Utc::now() - dt).abs() < Duration::seconds(5)
    }

    #[test]
    fn test_instant_passes_through() {
        assert_eq!(normalize_timestamp(Some(&RawTimestamp::Instant(fixed()))), fixed());
    }

    #[test]
    fn test_native_handle_is_converted() {
        let raw = RawTimestamp::Native(StoreTimestamp::from_date_time(fixed()));
        assert_eq!(normalize_timestamp(Some(&raw)), fixed());
    }

    #[test]
    fn test_iso_strings() {
        let zulu = RawTimestamp::Text("2024-02-29T08:30:00.000Z".to_string());
        assert_eq!(normalize_timestamp(Some(&zulu)), fixed());

        let offset = RawTimestamp::Text("2024-02-29T10:30:00+02:00".to_string());
        assert_eq!(normalize_timestamp(Some(&offset)), fixed());

        let naive = RawTimestamp::Text("2024-02-29T08:30:00".to_string());
        assert_eq!(normalize_timestamp(Some(&naive)), fixed());
    }

    #[test]
    fn test_absent_or_garbage_defaults_to_now() {
        assert!(close_to_now(normalize_timestamp(None)));
        assert!(close_to_now(normalize_timestamp(Some(&RawTimestamp::Text(
            "yesterday".to_string()
        )))));
        let broken = RawTimestamp::Native(StoreTimestamp {
            seconds: i64::MAX,
            nanos: 0,
        });
        assert!(close_to_now(normalize_timestamp(Some(&broken))));
    }

    #[test]
    fn test_normalize_record_keeps_fields() {
        let record = RawRecord {
            id: EntryId::from("r1"),
            title: "Vagabond".to_string(),
            episode: 37,
            link: "https://example.com/vagabond".to_string(),
            is_mature: true,
            updated_at: Some(RawTimestamp::Native(StoreTimestamp::from_date_time(fixed()))),
        };
        let entry = normalize_record(record);
        assert_eq!(entry.id.as_str(), "r1");
        assert_eq!(entry.episode, 37);
        assert!(entry.is_mature);
        assert_eq!(entry.updated_at, fixed());
    }
}
