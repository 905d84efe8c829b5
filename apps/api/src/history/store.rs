//! History persistence port.
//!
//! Records live in per-user collections, are immutable once written, and come back
//! newest first. The only mutation is an all-or-nothing bulk delete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::auth::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Posts,
    ResumeAnalyses,
    Roadmaps,
    Interviews,
    Resumes,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::ResumeAnalyses => "resume-analyses",
            Collection::Roadmaps => "roadmaps",
            Collection::Interviews => "interviews",
            Collection::Resumes => "resumes",
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored payload could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One stored record, payload still untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: Uuid,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stores `payload` for `user` and returns its generated id.
    async fn append(
        &self,
        collection: Collection,
        user: &UserId,
        payload: Value,
    ) -> Result<Uuid, PersistenceError>;

    /// Records for `user`, newest first.
    async fn list(
        &self,
        collection: Collection,
        user: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<StoredRecord>, PersistenceError>;

    /// Deletes exactly `ids`. If any id is not one of `user`'s records in
    /// `collection`, nothing is deleted and `NotFound` is returned.
    async fn delete_many(
        &self,
        collection: Collection,
        user: &UserId,
        ids: &[Uuid],
    ) -> Result<(), PersistenceError>;
}

/// A payload type bound to one collection.
pub trait RecordKind: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

/// A typed record as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<R> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: R,
}

pub async fn append_record<R: RecordKind>(
    store: &dyn HistoryStore,
    user: &UserId,
    record: &R,
) -> Result<Uuid, PersistenceError> {
    let payload = serde_json::to_value(record)?;
    store.append(R::COLLECTION, user, payload).await
}

pub async fn list_records<R: RecordKind>(
    store: &dyn HistoryStore,
    user: &UserId,
    limit: Option<usize>,
) -> Result<Vec<Record<R>>, PersistenceError> {
    store
        .list(R::COLLECTION, user, limit)
        .await?
        .into_iter()
        .map(|stored| {
            Ok(Record {
                id: stored.id,
                created_at: stored.created_at,
                data: serde_json::from_value(stored.payload)?,
            })
        })
        .collect()
}

/// Result of the history write that follows a successful generation.
/// A failed write is reported, never raised: the generated result is still returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub record_id: Option<Uuid>,
    pub persistence_error: Option<String>,
}

impl SaveOutcome {
    pub fn saved(id: Uuid) -> Self {
        Self {
            record_id: Some(id),
            persistence_error: None,
        }
    }

    pub fn from_result(result: Result<Uuid, PersistenceError>, what: &str) -> Self {
        match result {
            Ok(id) => Self::saved(id),
            Err(e) => {
                warn!("Failed to save {what} to history: {e}");
                Self {
                    record_id: None,
                    persistence_error: Some(format!(
                        "Your {what} was generated but could not be saved to your history. \
                         Copy it now; it will be lost when you leave."
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path_names_round_trip_through_serde() {
        for collection in [
            Collection::Posts,
            Collection::ResumeAnalyses,
            Collection::Roadmaps,
            Collection::Interviews,
            Collection::Resumes,
        ] {
            let encoded = serde_json::to_value(collection).unwrap();
            assert_eq!(encoded, Value::String(collection.as_str().to_string()));
        }
    }

    #[test]
    fn test_save_outcome_reports_failure_without_id() {
        let outcome = SaveOutcome::from_result(
            Err(PersistenceError::NotFound("gone".to_string())),
            "roadmap",
        );
        assert!(outcome.record_id.is_none());
        assert!(outcome.persistence_error.unwrap().contains("roadmap"));
    }
}
