use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::UserId;
use crate::history::store::{Collection, HistoryStore, PersistenceError, StoredRecord};
use crate::models::history::HistoryRow;

/// Postgres-backed history. All collections share `history_records`;
/// payloads are stored as JSONB.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(
        &self,
        collection: Collection,
        user: &UserId,
        payload: Value,
    ) -> Result<Uuid, PersistenceError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO history_records (id, user_id, collection, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(user.as_str())
        .bind(collection.as_str())
        .bind(&payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!("Stored {} record {id} for user {user}", collection.as_str());
        Ok(id)
    }

    async fn list(
        &self,
        collection: Collection,
        user: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<StoredRecord>, PersistenceError> {
        // LIMIT NULL means no limit in Postgres.
        let limit = limit.map(|l| l.min(i64::MAX as usize) as i64);

        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, payload, created_at
            FROM history_records
            WHERE user_id = $1 AND collection = $2
            ORDER BY created_at DESC, seq DESC
            LIMIT $3
            "#,
        )
        .bind(user.as_str())
        .bind(collection.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StoredRecord {
                id: row.id,
                payload: row.payload,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn delete_many(
        &self,
        collection: Collection,
        user: &UserId,
        ids: &[Uuid],
    ) -> Result<(), PersistenceError> {
        let unique: Vec<Uuid> = ids
            .iter()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if unique.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM history_records
            WHERE user_id = $1 AND collection = $2 AND id = ANY($3)
            "#,
        )
        .bind(user.as_str())
        .bind(collection.as_str())
        .bind(&unique)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted != unique.len() as u64 {
            tx.rollback().await?;
            return Err(PersistenceError::NotFound(format!(
                "{} of {} {} records do not exist for this user",
                unique.len() as u64 - deleted,
                unique.len(),
                collection.as_str()
            )));
        }

        tx.commit().await?;
        info!(
            "Deleted {} {} records for user {user}",
            deleted,
            collection.as_str()
        );
        Ok(())
    }
}
