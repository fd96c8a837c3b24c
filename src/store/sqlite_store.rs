// src/store/sqlite_store.rs
//
// SQLite-backed document store. Queries run on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use uuid::Uuid;

use super::document_store::{
    DocumentStore, InsertReceipt, RawRecord, RawTimestamp, RecordFilter, StoreTimestamp,
};
use crate::db::{get_connection, ConnectionPool};
use crate::domain::{EntryDraft, EntryId};
use crate::error::{AppError, AppResult};

pub struct SqliteDocumentStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteDocumentStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to RawRecord - returns rusqlite::Error for query_map compatibility
    fn row_to_record(row: &Row) -> Result<RawRecord, rusqlite::Error> {
        let id: String = row.get("id")?;
        let episode: i64 = row.get("episode")?;
        let episode = u32::try_from(episode).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
        })?;

        let seconds: Option<i64> = row.get("updated_seconds")?;
        let nanos: Option<i64> = row.get("updated_nanos")?;
        let updated_at = seconds.map(|seconds| {
            RawTimestamp::Native(StoreTimestamp {
                seconds,
                nanos: nanos.and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
            })
        });

        Ok(RawRecord {
            id: EntryId::new(id),
            title: row.get("title")?,
            episode,
            link: row.get("link")?,
            is_mature: row.get("is_mature")?,
            updated_at,
        })
    }

    fn query_all_blocking(pool: &ConnectionPool, filter: RecordFilter) -> AppResult<Vec<RawRecord>> {
        let conn = get_connection(pool)?;

        let sql = match filter {
            RecordFilter::All => {
                "SELECT id, title, episode, link, is_mature, updated_seconds, updated_nanos
                 FROM entries
                 ORDER BY title COLLATE NOCASE, title"
            }
            RecordFilter::ExcludeMature => {
                "SELECT id, title, episode, link, is_mature, updated_seconds, updated_nanos
                 FROM entries
                 WHERE is_mature = 0
                 ORDER BY title COLLATE NOCASE, title"
            }
        };

        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn insert_blocking(pool: &ConnectionPool, draft: &EntryDraft) -> AppResult<InsertReceipt> {
        let conn = get_connection(pool)?;
        let id = Uuid::new_v4().to_string();
        let stamp = StoreTimestamp::now();

        conn.execute(
            "INSERT INTO entries (id, title, episode, link, is_mature, updated_seconds, updated_nanos)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                draft.title,
                draft.episode as i64,
                draft.link,
                draft.is_mature,
                stamp.seconds,
                stamp.nanos as i64,
            ],
        )?;

        Ok(InsertReceipt {
            id: EntryId::new(id),
            updated_at: Some(RawTimestamp::Native(stamp)),
        })
    }

    fn update_blocking(
        pool: &ConnectionPool,
        id: &EntryId,
        draft: &EntryDraft,
    ) -> AppResult<Option<RawTimestamp>> {
        let conn = get_connection(pool)?;
        let stamp = StoreTimestamp::now();

        let rows_affected = conn.execute(
            "UPDATE entries
             SET title = ?2, episode = ?3, link = ?4, is_mature = ?5,
                 updated_seconds = ?6, updated_nanos = ?7
             WHERE id = ?1",
            params![
                id.as_str(),
                draft.title,
                draft.episode as i64,
                draft.link,
                draft.is_mature,
                stamp.seconds,
                stamp.nanos as i64,
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(Some(RawTimestamp::Native(stamp)))
    }

    fn delete_blocking(pool: &ConnectionPool, id: &EntryId) -> AppResult<()> {
        let conn = get_connection(pool)?;
        // Missing ids are not an error
        conn.execute("DELETE FROM entries WHERE id = ?1", params![id.as_str()])?;
        Ok(())
    }

    fn batch_insert_blocking(pool: &ConnectionPool, drafts: &[EntryDraft]) -> AppResult<usize> {
        let mut conn = get_connection(pool)?;
        let stamp = StoreTimestamp::now();

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (id, title, episode, link, is_mature, updated_seconds, updated_nanos)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for draft in drafts {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    draft.title,
                    draft.episode as i64,
                    draft.link,
                    draft.is_mature,
                    stamp.seconds,
                    stamp.nanos as i64,
                ])?;
            }
        }
        tx.commit()?;

        Ok(drafts.len())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn query_all(&self, filter: RecordFilter) -> AppResult<Vec<RawRecord>> {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || Self::query_all_blocking(&pool, filter)).await?
    }

    async fn insert(&self, draft: &EntryDraft) -> AppResult<InsertReceipt> {
        let pool = Arc::clone(&self.pool);
        let draft = draft.clone();
        tokio::task::spawn_blocking(move || Self::insert_blocking(&pool, &draft)).await?
    }

    async fn update(&self, id: &EntryId, draft: &EntryDraft) -> AppResult<Option<RawTimestamp>> {
        let pool = Arc::clone(&self.pool);
        let id = id.clone();
        let draft = draft.clone();
        tokio::task::spawn_blocking(move || Self::update_blocking(&pool, &id, &draft)).await?
    }

    async fn delete(&self, id: &EntryId) -> AppResult<()> {
        let pool = Arc::clone(&self.pool);
        let id = id.clone();
        tokio::task::spawn_blocking(move || Self::delete_blocking(&pool, &id)).await?
    }

    async fn batch_insert(&self, drafts: &[EntryDraft]) -> AppResult<usize> {
        let pool = Arc::clone(&self.pool);
        let drafts = drafts.to_vec();
        tokio::task::spawn_blocking(move || Self::batch_insert_blocking(&pool, &drafts)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};

    fn store() -> SqliteDocumentStore {
        let pool = create_memory_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteDocumentStore::new(Arc::new(pool))
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_native_timestamp() {
        let store = store();
        let receipt = store
            .insert(&EntryDraft::new("Berserk", 12, "https://example.com/berserk"))
            .await
            .unwrap();

        assert!(!receipt.id.as_str().is_empty());
        assert!(matches!(receipt.updated_at, Some(RawTimestamp::Native(_))));

        let records = store.query_all(RecordFilter::All).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, receipt.id);
        assert_eq!(records[0].episode, 12);
        assert!(!records[0].is_mature);
    }

    #[tokio::test]
    async fn test_query_orders_by_title_and_filters() {
        let store = store();
        store.insert(&EntryDraft::new("charlie", 1, "u")).await.unwrap();
        store.insert(&EntryDraft::new("Alpha", 1, "u").mature(true)).await.unwrap();
        store.insert(&EntryDraft::new("bravo", 1, "u")).await.unwrap();

        let all = store.query_all(RecordFilter::All).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "bravo", "charlie"]);

        let safe = store.query_all(RecordFilter::ExcludeMature).await.unwrap();
        assert_eq!(safe.len(), 2);
        assert!(safe.iter().all(|r| !r.is_mature));
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let store = store();
        let result = store
            .update(&EntryId::from("abc"), &EntryDraft::new("New", 1, "u"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        let receipt = store.insert(&EntryDraft::new("Monster", 74, "u")).await.unwrap();

        store.delete(&receipt.id).await.unwrap();
        store.delete(&receipt.id).await.unwrap();
        assert!(store.query_all(RecordFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_insert_is_atomic() {
        let store = store();
        store.insert(&EntryDraft::new("Existing", 1, "u")).await.unwrap();

        // make the second row of the batch fail mid-transaction
        let pool = Arc::clone(&store.pool);
        let conn = pool.get().unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON entries
             WHEN NEW.title = 'Bad' BEGIN SELECT RAISE(ABORT, 'bad row'); END;",
        )
        .unwrap();
        drop(conn);

        let drafts = vec![
            EntryDraft::new("Good", 1, "u"),
            EntryDraft::new("Bad", 2, "u"),
        ];
        assert!(store.batch_insert(&drafts).await.is_err());

        let records = store.query_all(RecordFilter::All).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Existing");

        let count = store
            .batch_insert(&[EntryDraft::new("Good", 1, "u")])
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
