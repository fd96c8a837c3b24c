// src/store/document_store.rs
//
// Capability contract of the durable record store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EntryDraft, EntryId};
use crate::error::AppResult;

/// Store-native timestamp handle (seconds + nanoseconds since the epoch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl StoreTimestamp {
    pub fn now() -> Self {
        Self::from_date_time(Utc::now())
    }

    pub fn from_date_time(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }

    /// None when out of range
    pub fn to_date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

/// Every shape a timestamp may take when it leaves a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    Instant(DateTime<Utc>),
    Text(String),
    Native(StoreTimestamp),
}

/// A record as returned by `query_all`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub id: EntryId,
    pub title: String,
    pub episode: u32,
    pub link: String,
    pub is_mature: bool,
    pub updated_at: Option<RawTimestamp>,
}

/// Result of an insert: the new id plus the write timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertReceipt {
    pub id: EntryId,
    pub updated_at: Option<RawTimestamp>,
}

/// Optional visibility predicate applied by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFilter {
    #[default]
    All,
    ExcludeMature,
}

impl RecordFilter {
    pub fn admits(&self, is_mature: bool) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::ExcludeMature => !is_mature,
        }
    }
}

/// Durable keyed record storage.
///
/// Results of `query_all` come back ordered by title ascending.
/// Deleting a missing id succeeds; updating a missing id may fail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query_all(&self, filter: RecordFilter) -> AppResult<Vec<RawRecord>>;

    async fn insert(&self, draft: &EntryDraft) -> AppResult<InsertReceipt>;

    async fn update(&self, id: &EntryId, draft: &EntryDraft) -> AppResult<Option<RawTimestamp>>;

    async fn delete(&self, id: &EntryId) -> AppResult<()>;

    /// All-or-nothing insert; returns the number of records written
    async fn batch_insert(&self, drafts: &[EntryDraft]) -> AppResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_store_timestamp_roundtrips_instant() {
        let dt = Utc.with_ymd_and_hms(2023, 3, 14, 15, 9, 26).unwrap();
        let ts = StoreTimestamp::from_date_time(dt);
        assert_eq!(ts.to_date_time(), Some(dt));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let ts = StoreTimestamp {
            seconds: i64::MAX,
            nanos: 0,
        };
        assert!(ts.to_date_time().is_none());
    }

    #[test]
    fn test_filter_admits() {
        assert!(RecordFilter::All.admits(true));
        assert!(!RecordFilter::ExcludeMature.admits(true));
        assert!(RecordFilter::ExcludeMature.admits(false));
    }
}
