use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::flows::linkedin::Tone;
use crate::history::store::{Collection, RecordKind};
use crate::interview::session::CompletionReason;

#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInPostRecord {
    pub content: String,
    pub tone: Tone,
    pub project_details: String,
}

impl RecordKind for LinkedInPostRecord {
    const COLLECTION: Collection = Collection::Posts;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysisRecord {
    pub overall_score: f64,
    pub student_project_portfolio_score: f64,
    pub technical_knowledge_score: f64,
    pub keyword_score: f64,
    pub keyword_matches: Vec<String>,
    pub keyword_gaps: Vec<String>,
    pub suggestions: String,
    pub job_description: String,
}

impl RecordKind for ResumeAnalysisRecord {
    const COLLECTION: Collection = Collection::ResumeAnalyses;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapRoadmapRecord {
    pub target_role: String,
    pub job_description: String,
    pub roadmap: String,
}

impl RecordKind for SkillGapRoadmapRecord {
    const COLLECTION: Collection = Collection::Roadmaps;
}

/// A finished mock interview. `transcript` holds one `role: content` paragraph per turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockInterviewRecord {
    pub session_id: Uuid,
    pub job_description: String,
    pub transcript: String,
    pub final_score: f64,
    pub final_feedback: String,
    pub question_count: u32,
    pub completion: CompletionReason,
}

impl RecordKind for MockInterviewRecord {
    const COLLECTION: Collection = Collection::Interviews;
}

/// An uploaded resume kept for reuse by the analyzer and the interviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResume {
    pub name: String,
    pub mime_type: String,
    pub data_uri: String,
    /// Text extracted at upload time.
    pub text: String,
}

impl RecordKind for StoredResume {
    const COLLECTION: Collection = Collection::Resumes;
}
