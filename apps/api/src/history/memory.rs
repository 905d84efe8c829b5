//! In-process history store, used when no `DATABASE_URL` is configured and in tests.
//! Contents are lost on restart.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::UserId;
use crate::history::store::{Collection, HistoryStore, PersistenceError, StoredRecord};

struct MemoryRow {
    seq: u64,
    id: Uuid,
    user: UserId,
    collection: Collection,
    payload: Value,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    rows: Vec<MemoryRow>,
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    inner: RwLock<Inner>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(
        &self,
        collection: Collection,
        user: &UserId,
        payload: Value,
    ) -> Result<Uuid, PersistenceError> {
        let mut inner = self.inner.write().await;
        let id = Uuid::new_v4();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.push(MemoryRow {
            seq,
            id,
            user: user.clone(),
            collection,
            payload,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list(
        &self,
        collection: Collection,
        user: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<StoredRecord>, PersistenceError> {
        let inner = self.inner.read().await;
        let mut owned: Vec<&MemoryRow> = inner
            .rows
            .iter()
            .filter(|r| r.collection == collection && &r.user == user)
            .collect();
        // Newest first; insertion order breaks timestamp ties.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));

        Ok(owned
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|r| StoredRecord {
                id: r.id,
                payload: r.payload.clone(),
                created_at: r.created_at,
            })
            .collect())
    }

    async fn delete_many(
        &self,
        collection: Collection,
        user: &UserId,
        ids: &[Uuid],
    ) -> Result<(), PersistenceError> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.write().await;
        let owned = inner
            .rows
            .iter()
            .filter(|r| r.collection == collection && &r.user == user && wanted.contains(&r.id))
            .count();
        if owned != wanted.len() {
            return Err(PersistenceError::NotFound(format!(
                "{} of {} {} records do not exist for this user",
                wanted.len() - owned,
                wanted.len(),
                collection.as_str()
            )));
        }

        inner
            .rows
            .retain(|r| !(r.collection == collection && &r.user == user && wanted.contains(&r.id)));
        Ok(())
    }
}
