//! Axum route handlers for the history API.
//!
//! Listing returns each record together with the parsed segments a client needs to
//! display it, so free-text fields never have to be re-parsed downstream.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::UserId;
use crate::errors::AppError;
use crate::history::store::{list_records, Collection, HistoryStore, Record};
use crate::models::history::{
    LinkedInPostRecord, MockInterviewRecord, ResumeAnalysisRecord, SkillGapRoadmapRecord,
};
use crate::presentation::{
    collect_links, parse_suggestions, parse_transcript, segment_sections, split_links, Inline,
    Section, SuggestionList, TranscriptLine,
};
use crate::state::AppState;

const MAX_LIST_LIMIT: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub record: Record<LinkedInPostRecord>,
    /// The post split into lines, with links separated out.
    pub lines: Vec<Vec<Inline>>,
}

#[derive(Debug, Serialize)]
pub struct ResumeAnalysisView {
    #[serde(flatten)]
    pub record: Record<ResumeAnalysisRecord>,
    pub parsed_suggestions: SuggestionList,
}

#[derive(Debug, Serialize)]
pub struct RoadmapView {
    #[serde(flatten)]
    pub record: Record<SkillGapRoadmapRecord>,
    pub sections: Vec<Section>,
    pub resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InterviewView {
    #[serde(flatten)]
    pub record: Record<MockInterviewRecord>,
    pub transcript_lines: Vec<TranscriptLine>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Post(PostView),
    ResumeAnalysis(ResumeAnalysisView),
    Roadmap(RoadmapView),
    Interview(InterviewView),
}

#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    pub collection: Collection,
    pub records: Vec<HistoryEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/history/:collection?limit=
///
/// Newest first. Without `limit` every record is returned.
pub async fn handle_list_history(
    State(state): State<AppState>,
    user: UserId,
    Path(collection): Path<Collection>,
    Query(query): Query<ListQuery>,
) -> Result<Json<HistoryListResponse>, AppError> {
    let limit = query.limit.map(|l| l.min(MAX_LIST_LIMIT));
    let records = list_views(state.history.as_ref(), &user, collection, limit).await?;
    Ok(Json(HistoryListResponse {
        collection,
        records,
    }))
}

/// DELETE /api/v1/history/:collection
///
/// Deletes exactly the given ids, or nothing if any of them is unknown.
pub async fn handle_delete_history(
    State(state): State<AppState>,
    user: UserId,
    Path(collection): Path<Collection>,
    Json(request): Json<DeleteRequest>,
) -> Result<StatusCode, AppError> {
    require_history_collection(collection)?;
    state
        .history
        .delete_many(collection, &user, &request.ids)
        .await?;
    tracing::info!(
        "User {user} deleted {} {} record(s)",
        request.ids.len(),
        collection.as_str()
    );
    Ok(StatusCode::NO_CONTENT)
}

fn require_history_collection(collection: Collection) -> Result<(), AppError> {
    match collection {
        Collection::Resumes => Err(AppError::NotFound(
            "Stored resumes are managed under /api/v1/resumes".to_string(),
        )),
        _ => Ok(()),
    }
}

pub async fn list_views(
    store: &dyn HistoryStore,
    user: &UserId,
    collection: Collection,
    limit: Option<usize>,
) -> Result<Vec<HistoryEntry>, AppError> {
    require_history_collection(collection)?;

    let entries: Vec<HistoryEntry> = match collection {
        Collection::Posts => list_records::<LinkedInPostRecord>(store, user, limit)
            .await?
            .into_iter()
            .map(|record| {
                let lines = record.data.content.lines().map(split_links).collect();
                HistoryEntry::Post(PostView { record, lines })
            })
            .collect(),
        Collection::ResumeAnalyses => list_records::<ResumeAnalysisRecord>(store, user, limit)
            .await?
            .into_iter()
            .map(|record| {
                let parsed_suggestions = parse_suggestions(&record.data.suggestions);
                HistoryEntry::ResumeAnalysis(ResumeAnalysisView {
                    record,
                    parsed_suggestions,
                })
            })
            .collect(),
        Collection::Roadmaps => list_records::<SkillGapRoadmapRecord>(store, user, limit)
            .await?
            .into_iter()
            .map(|record| {
                let sections = segment_sections(&record.data.roadmap);
                let resources = collect_links(&record.data.roadmap);
                HistoryEntry::Roadmap(RoadmapView {
                    record,
                    sections,
                    resources,
                })
            })
            .collect(),
        Collection::Interviews => list_records::<MockInterviewRecord>(store, user, limit)
            .await?
            .into_iter()
            .map(|record| {
                let transcript_lines = parse_transcript(&record.data.transcript);
                HistoryEntry::Interview(InterviewView {
                    record,
                    transcript_lines,
                })
            })
            .collect(),
        Collection::Resumes => Vec::new(),
    };
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::linkedin::Tone;
    use crate::history::memory::MemoryHistoryStore;
    use crate::history::store::append_record;
    use crate::interview::session::{CompletionReason, Role};

    fn user() -> UserId {
        UserId::parse("u-1").unwrap()
    }

    #[tokio::test]
    async fn test_roadmap_view_carries_sections_and_links() {
        let store = MemoryHistoryStore::new();
        let record = SkillGapRoadmapRecord {
            target_role: "SRE".to_string(),
            job_description: "jd".to_string(),
            roadmap: "Intro\n\n**Week 1: Linux**\nRead https://kernel.org/doc.\n\n**Week 2: Go**\nTour"
                .to_string(),
        };
        append_record(&store, &user(), &record).await.unwrap();

        let views = list_views(&store, &user(), Collection::Roadmaps, None).await.unwrap();
        match &views[0] {
            HistoryEntry::Roadmap(view) => {
                assert_eq!(view.resources, vec!["https://kernel.org/doc".to_string()]);
                let titles: Vec<&str> = view.sections.iter().map(|s| s.title.as_str()).collect();
                assert_eq!(titles, vec!["", "Week 1: Linux", "Week 2: Go"]);
            }
            other => panic!("expected roadmap view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interview_view_parses_transcript() {
        let store = MemoryHistoryStore::new();
        let record = MockInterviewRecord {
            session_id: Uuid::new_v4(),
            job_description: "jd".to_string(),
            transcript: "assistant: Why Rust?\n\nuser: Memory safety.".to_string(),
            final_score: 70.0,
            final_feedback: "ok".to_string(),
            question_count: 1,
            completion: CompletionReason::Model,
        };
        append_record(&store, &user(), &record).await.unwrap();

        let views = list_views(&store, &user(), Collection::Interviews, Some(5))
            .await
            .unwrap();
        match &views[0] {
            HistoryEntry::Interview(view) => {
                assert_eq!(view.transcript_lines.len(), 2);
                assert_eq!(view.transcript_lines[1].role, Some(Role::User));
            }
            other => panic!("expected interview view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_post_view_serializes_record_fields_flat() {
        let store = MemoryHistoryStore::new();
        let record = LinkedInPostRecord {
            content: "Shipped it!\nDetails: https://example.com".to_string(),
            tone: Tone::Hype,
            project_details: "details".to_string(),
        };
        append_record(&store, &user(), &record).await.unwrap();

        let views = list_views(&store, &user(), Collection::Posts, None).await.unwrap();
        let json = serde_json::to_value(&views[0]).unwrap();
        assert_eq!(json["tone"], "hype");
        assert!(json["id"].is_string());
        assert_eq!(json["lines"][1][1]["kind"], "link");
    }

    #[tokio::test]
    async fn test_resume_collection_is_not_listed_here() {
        let store = MemoryHistoryStore::new();
        let err = list_views(&store, &user(), Collection::Resumes, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
