//! Axum route handlers for the one-shot generation flows and the resume library.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::UserId;
use crate::errors::AppError;
use crate::flows::linkedin::{generate_post, GeneratePostInput, RECALLED_POSTS};
use crate::flows::resume::{analyze_resume, AnalyzeResumeOutput};
use crate::flows::resume_data::resume_text_from_data_uri;
use crate::flows::roadmap::{generate_roadmap, GenerateRoadmapInput};
use crate::flows::validation;
use crate::history::resumes::{
    list_resumes, select_resume_text, upload_resume, ResumeSummary, UploadResumeRequest,
    UploadedResume,
};
use crate::history::store::{append_record, list_records, SaveOutcome};
use crate::models::history::{LinkedInPostRecord, SkillGapRoadmapRecord};
use crate::presentation::{
    collect_links, parse_suggestions, segment_sections, Section, SuggestionList,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GeneratePostResponse {
    pub post: String,
    #[serde(flatten)]
    pub save: SaveOutcome,
}

/// Exactly one of `resumeDataUri` and `resumeId` must be present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    pub resume_data_uri: Option<String>,
    pub resume_id: Option<Uuid>,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    #[serde(flatten)]
    pub analysis: AnalyzeResumeOutput,
    pub parsed_suggestions: SuggestionList,
    #[serde(flatten)]
    pub save: SaveOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoadmapResponse {
    pub learning_roadmap: String,
    pub sections: Vec<Section>,
    pub resources: Vec<String>,
    #[serde(flatten)]
    pub save: SaveOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/posts/generate
///
/// Recalls the user's latest posts for voice consistency, generates, then stores the post.
pub async fn handle_generate_post(
    State(state): State<AppState>,
    user: UserId,
    Json(input): Json<GeneratePostInput>,
) -> Result<Json<GeneratePostResponse>, AppError> {
    input.validate()?;

    let previous: Vec<String> =
        match list_records::<LinkedInPostRecord>(state.history.as_ref(), &user, Some(RECALLED_POSTS))
            .await
        {
            Ok(records) => records.into_iter().map(|r| r.data.content).collect(),
            Err(e) => {
                warn!("Could not recall previous posts for user {user}: {e}");
                Vec::new()
            }
        };

    let output = generate_post(state.llm.as_ref(), &input, &previous).await?;
    info!(
        "Generated {} post for user {user} ({} recalled)",
        input.tone.as_str(),
        previous.len()
    );

    let record = LinkedInPostRecord {
        content: output.post.clone(),
        tone: input.tone,
        project_details: input.project_details.trim().to_string(),
    };
    let save = SaveOutcome::from_result(
        append_record(state.history.as_ref(), &user, &record).await,
        "post",
    );

    Ok(Json(GeneratePostResponse {
        post: output.post,
        save,
    }))
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    user: UserId,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let job_description = validation::job_description(&request.job_description)?.to_string();

    let resume_text = match (request.resume_data_uri, request.resume_id) {
        (Some(uri), None) => resume_text_from_data_uri(uri).await?.1,
        (None, Some(id)) => select_resume_text(state.history.as_ref(), &user, Some(id), false)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?,
        _ => {
            return Err(AppError::Validation(
                "Provide exactly one of resumeDataUri or resumeId".to_string(),
            ))
        }
    };

    let analysis = analyze_resume(state.llm.as_ref(), &resume_text, &job_description).await?;
    info!(
        "Analyzed resume for user {user}: overall {}",
        analysis.overall_score
    );

    let record = analysis.clone().into_record(&job_description);
    let save = SaveOutcome::from_result(
        append_record(state.history.as_ref(), &user, &record).await,
        "resume analysis",
    );

    Ok(Json(AnalyzeResumeResponse {
        parsed_suggestions: parse_suggestions(&analysis.suggestions),
        analysis,
        save,
    }))
}

/// POST /api/v1/roadmaps/generate
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    user: UserId,
    Json(input): Json<GenerateRoadmapInput>,
) -> Result<Json<GenerateRoadmapResponse>, AppError> {
    input.validate()?;

    let output = generate_roadmap(state.llm.as_ref(), &input).await?;
    info!("Generated roadmap for user {user}");

    let record = SkillGapRoadmapRecord {
        target_role: input.target_role.trim().to_string(),
        job_description: input.job_description.trim().to_string(),
        roadmap: output.learning_roadmap.clone(),
    };
    let save = SaveOutcome::from_result(
        append_record(state.history.as_ref(), &user, &record).await,
        "roadmap",
    );

    Ok(Json(GenerateRoadmapResponse {
        sections: segment_sections(&output.learning_roadmap),
        resources: collect_links(&output.learning_roadmap),
        learning_roadmap: output.learning_roadmap,
        save,
    }))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let resumes = list_resumes(state.history.as_ref(), &user).await?;
    Ok(Json(resumes.iter().map(ResumeSummary::from).collect()))
}

/// POST /api/v1/resumes
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    user: UserId,
    Json(request): Json<UploadResumeRequest>,
) -> Result<Json<UploadedResume>, AppError> {
    let uploaded = upload_resume(state.history.as_ref(), &user, request).await?;
    info!("Stored resume {} for user {user}", uploaded.resume.id);
    Ok(Json(uploaded))
}
