//! Per-user resume library: a small, capped set of uploaded resumes that the
//! analyzer and the interviewer can reuse by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::UserId;
use crate::errors::AppError;
use crate::flows::resume_data::resume_text_from_data_uri;
use crate::history::store::{append_record, list_records, HistoryStore, Record, RecordKind};
use crate::models::history::StoredResume;

pub const MAX_STORED_RESUMES: usize = 2;
const MAX_NAME_CHARS: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResumeRequest {
    pub name: String,
    pub data_uri: String,
    /// Stored resume to overwrite. Without it the oldest is evicted once the cap is exceeded.
    pub replace_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Record<StoredResume>> for ResumeSummary {
    fn from(record: &Record<StoredResume>) -> Self {
        Self {
            id: record.id,
            name: record.data.name.clone(),
            mime_type: record.data.mime_type.clone(),
            created_at: record.created_at,
        }
    }
}

pub async fn list_resumes(
    store: &dyn HistoryStore,
    user: &UserId,
) -> Result<Vec<Record<StoredResume>>, AppError> {
    Ok(list_records::<StoredResume>(store, user, None).await?)
}

/// Result of an upload. The resume is stored even when trimming the library failed;
/// the next upload retries the eviction.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedResume {
    #[serde(flatten)]
    pub resume: ResumeSummary,
    pub evicted: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eviction_error: Option<String>,
}

/// Stores a resume, then trims the library back to `MAX_STORED_RESUMES`.
pub async fn upload_resume(
    store: &dyn HistoryStore,
    user: &UserId,
    request: UploadResumeRequest,
) -> Result<UploadedResume, AppError> {
    let name = request.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "name must be between 1 and {MAX_NAME_CHARS} characters"
        )));
    }

    // Newest first; keep room for the upload.
    let existing = list_resumes(store, user).await?;
    let evict: Vec<Uuid> = match request.replace_id {
        Some(replace_id) => {
            if !existing.iter().any(|r| r.id == replace_id) {
                return Err(AppError::NotFound(format!("Resume {replace_id} not found")));
            }
            vec![replace_id]
        }
        None => existing
            .iter()
            .skip(MAX_STORED_RESUMES.saturating_sub(1))
            .map(|r| r.id)
            .collect(),
    };

    let (mime_type, text) = resume_text_from_data_uri(request.data_uri.clone()).await?;
    let resume = StoredResume {
        name: name.to_string(),
        mime_type,
        data_uri: request.data_uri,
        text,
    };
    let id = append_record(store, user, &resume).await?;
    let summary = ResumeSummary {
        id,
        name: resume.name,
        mime_type: resume.mime_type,
        created_at: Utc::now(),
    };

    // Evict only once the new resume is stored.
    let eviction_error = if evict.is_empty() {
        None
    } else {
        match store
            .delete_many(StoredResume::COLLECTION, user, &evict)
            .await
        {
            Ok(()) => {
                info!("Evicted {} stored resume(s) for user {user}", evict.len());
                None
            }
            Err(e) => {
                warn!("Stored resume {id} but could not evict {evict:?} for user {user}: {e}");
                Some(e.to_string())
            }
        }
    };

    Ok(UploadedResume {
        resume: summary,
        evicted: if eviction_error.is_none() { evict } else { Vec::new() },
        eviction_error,
    })
}

/// Resolves the resume text for a flow.
///
/// When the user has stored resumes and `required_if_stored` is set, choosing one
/// is mandatory. An explicit id must name one of the user's resumes.
pub async fn select_resume_text(
    store: &dyn HistoryStore,
    user: &UserId,
    resume_id: Option<Uuid>,
    required_if_stored: bool,
) -> Result<Option<String>, AppError> {
    let stored = list_resumes(store, user).await?;

    match resume_id {
        Some(id) => stored
            .into_iter()
            .find(|r| r.id == id)
            .map(|r| Some(r.data.text))
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found"))),
        None if required_if_stored && !stored.is_empty() => Err(AppError::Validation(
            "Select one of your stored resumes (resume_id) to continue".to_string(),
        )),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::memory::MemoryHistoryStore;
    use crate::history::store::{Collection, PersistenceError, StoredRecord};
    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::Value;

    /// Memory store whose deletes fail, as when the database drops mid-request.
    struct NoDeleteStore {
        inner: MemoryHistoryStore,
    }

    #[async_trait]
    impl HistoryStore for NoDeleteStore {
        async fn append(
            &self,
            collection: Collection,
            user: &UserId,
            payload: Value,
        ) -> Result<Uuid, PersistenceError> {
            self.inner.append(collection, user, payload).await
        }

        async fn list(
            &self,
            collection: Collection,
            user: &UserId,
            limit: Option<usize>,
        ) -> Result<Vec<StoredRecord>, PersistenceError> {
            self.inner.list(collection, user, limit).await
        }

        async fn delete_many(
            &self,
            _collection: Collection,
            _user: &UserId,
            _ids: &[Uuid],
        ) -> Result<(), PersistenceError> {
            Err(PersistenceError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn user() -> UserId {
        UserId::parse("user-1").unwrap()
    }

    fn upload(name: &str, replace_id: Option<Uuid>) -> UploadResumeRequest {
        UploadResumeRequest {
            name: name.to_string(),
            data_uri: format!(
                "data:text/plain;base64,{}",
                STANDARD.encode(format!("{name} resume: Rust, SQL"))
            ),
            replace_id,
        }
    }

    #[tokio::test]
    async fn test_third_upload_evicts_oldest() {
        let store = MemoryHistoryStore::new();
        upload_resume(&store, &user(), upload("first", None)).await.unwrap();
        upload_resume(&store, &user(), upload("second", None)).await.unwrap();
        upload_resume(&store, &user(), upload("third", None)).await.unwrap();

        let names: Vec<String> = list_resumes(&store, &user())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.name)
            .collect();
        assert_eq!(names, vec!["third".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_replace_id_overwrites_the_named_resume() {
        let store = MemoryHistoryStore::new();
        let first = upload_resume(&store, &user(), upload("first", None)).await.unwrap();
        upload_resume(&store, &user(), upload("second", None)).await.unwrap();
        upload_resume(&store, &user(), upload("third", Some(first.resume.id)))
            .await
            .unwrap();

        let names: Vec<String> = list_resumes(&store, &user())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.name)
            .collect();
        assert_eq!(names, vec!["third".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_replace_id_stores_nothing() {
        let store = MemoryHistoryStore::new();
        let err = upload_resume(&store, &user(), upload("first", Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(list_resumes(&store, &user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_a_validation_error() {
        let store = MemoryHistoryStore::new();
        let mut request = upload("bad", None);
        request.data_uri = "data:image/png;base64,AAAA".to_string();
        let err = upload_resume(&store, &user(), request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_selection_is_mandatory_once_resumes_exist() {
        let store = MemoryHistoryStore::new();
        assert_eq!(
            select_resume_text(&store, &user(), None, true).await.unwrap(),
            None
        );

        let stored = upload_resume(&store, &user(), upload("mine", None)).await.unwrap();
        let err = select_resume_text(&store, &user(), None, true).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let text = select_resume_text(&store, &user(), Some(stored.resume.id), true)
            .await
            .unwrap()
            .unwrap();
        assert!(text.contains("Rust, SQL"));
    }

    #[tokio::test]
    async fn test_other_users_resume_is_not_found() {
        let store = MemoryHistoryStore::new();
        let stored = upload_resume(&store, &user(), upload("mine", None)).await.unwrap();
        let other = UserId::parse("user-2").unwrap();
        let err = select_resume_text(&store, &other, Some(stored.resume.id), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_eviction_still_reports_the_stored_upload() {
        let store = NoDeleteStore {
            inner: MemoryHistoryStore::new(),
        };
        upload_resume(&store, &user(), upload("first", None)).await.unwrap();
        let second = upload_resume(&store, &user(), upload("second", None)).await.unwrap();
        assert!(second.evicted.is_empty());
        assert!(second.eviction_error.is_none());

        let third = upload_resume(&store, &user(), upload("third", None)).await.unwrap();
        assert_eq!(third.resume.name, "third");
        assert!(third.evicted.is_empty());
        assert!(third.eviction_error.is_some());

        let stored = list_resumes(&store, &user()).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].id, third.resume.id);
    }

    #[tokio::test]
    async fn test_next_upload_trims_leftover_resumes() {
        let store = MemoryHistoryStore::new();
        for name in ["a", "b", "c"] {
            let resume = StoredResume {
                name: name.to_string(),
                mime_type: "text/plain".to_string(),
                data_uri: String::new(),
                text: String::new(),
            };
            append_record(&store, &user(), &resume).await.unwrap();
        }

        let uploaded = upload_resume(&store, &user(), upload("d", None)).await.unwrap();
        assert_eq!(uploaded.evicted.len(), 2);

        let names: Vec<String> = list_resumes(&store, &user())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.name)
            .collect();
        assert_eq!(names, vec!["d".to_string(), "c".to_string()]);
    }
}
