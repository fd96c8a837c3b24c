// src/store/memory_store.rs
//
// In-process document store with the same semantics as the SQLite one.
// Supports failure injection and per-operation call counts for tests and demos.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::document_store::{
    DocumentStore, InsertReceipt, RawRecord, RawTimestamp, RecordFilter, StoreTimestamp,
};
use crate::domain::{title_order, EntryDraft, EntryId};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    QueryAll,
    Insert,
    Update,
    Delete,
    BatchInsert,
}

/// Which timestamp representation the store hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampStyle {
    #[default]
    Native,
    Iso,
    Absent,
}

#[derive(Default)]
struct Inner {
    records: HashMap<EntryId, RawRecord>,
    failures: HashSet<StoreOp>,
    calls: HashMap<StoreOp, usize>,
}

pub struct InMemoryDocumentStore {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
    style: TimestampStyle,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_timestamp_style(TimestampStyle::default())
    }

    pub fn with_timestamp_style(style: TimestampStyle) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            next_id: AtomicU64::new(1),
            style,
        }
    }

    /// Put a record in place as-is, bypassing stamping
    pub fn seed(&self, record: RawRecord) {
        self.lock().records.insert(record.id.clone(), record);
    }

    /// Make every later call of `op` fail until cleared
    pub fn fail_on(&self, op: StoreOp) {
        self.lock().failures.insert(op);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn call_count(&self, op: StoreOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Total number of write calls (insert, update, delete, batch)
    pub fn write_count(&self) -> usize {
        [StoreOp::Insert, StoreOp::Update, StoreOp::Delete, StoreOp::BatchInsert]
            .iter()
            .map(|op| self.call_count(*op))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // recover from poisoning
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call and fail it if injected
    fn enter(&self, op: StoreOp) -> AppResult<std::sync::MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        *inner.calls.entry(op).or_insert(0) += 1;
        if inner.failures.contains(&op) {
            return Err(AppError::Other(format!("Injected store failure: {:?}", op)));
        }
        Ok(inner)
    }

    fn stamp(&self) -> Option<RawTimestamp> {
        match self.style {
            TimestampStyle::Native => Some(RawTimestamp::Native(StoreTimestamp::now())),
            TimestampStyle::Iso => Some(RawTimestamp::Text(Utc::now().to_rfc3339())),
            TimestampStyle::Absent => None,
        }
    }

    fn next_id(&self) -> EntryId {
        EntryId::new(format!("mem-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn record_from(&self, id: EntryId, draft: &EntryDraft, updated_at: Option<RawTimestamp>) -> RawRecord {
        RawRecord {
            id,
            title: draft.title.clone(),
            episode: draft.episode,
            link: draft.link.clone(),
            is_mature: draft.is_mature,
            updated_at,
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn query_all(&self, filter: RecordFilter) -> AppResult<Vec<RawRecord>> {
        let inner = self.enter(StoreOp::QueryAll)?;
        let mut records: Vec<RawRecord> = inner
            .records
            .values()
            .filter(|r| filter.admits(r.is_mature))
            .cloned()
            .collect();
        records.sort_by(|a, b| title_order(&a.title, &b.title));
        Ok(records)
    }

    async fn insert(&self, draft: &EntryDraft) -> AppResult<InsertReceipt> {
        let mut inner = self.enter(StoreOp::Insert)?;
        let id = self.next_id();
        let updated_at = self.stamp();
        let record = self.record_from(id.clone(), draft, updated_at.clone());
        inner.records.insert(id.clone(), record);
        Ok(InsertReceipt { id, updated_at })
    }

    async fn update(&self, id: &EntryId, draft: &EntryDraft) -> AppResult<Option<RawTimestamp>> {
        let mut inner = self.enter(StoreOp::Update)?;
        if !inner.records.contains_key(id) {
            return Err(AppError::NotFound);
        }
        let updated_at = self.stamp();
        let record = self.record_from(id.clone(), draft, updated_at.clone());
        inner.records.insert(id.clone(), record);
        Ok(updated_at)
    }

    async fn delete(&self, id: &EntryId) -> AppResult<()> {
        let mut inner = self.enter(StoreOp::Delete)?;
        inner.records.remove(id);
        Ok(())
    }

    async fn batch_insert(&self, drafts: &[EntryDraft]) -> AppResult<usize> {
        let mut inner = self.enter(StoreOp::BatchInsert)?;
        let updated_at = self.stamp();
        for draft in drafts {
            let id = self.next_id();
            let record = self.record_from(id.clone(), draft, updated_at.clone());
            inner.records.insert(id, record);
        }
        Ok(drafts.len())
    }
}
