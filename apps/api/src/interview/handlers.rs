//! Axum route handlers for the mock interviewer.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::UserId;
use crate::errors::AppError;
use crate::history::resumes::select_resume_text;
use crate::interview::controller::{SessionView, StartInterview, TurnResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitTurnRequest {
    pub answer: String,
    /// The question count the client last saw. A mismatch means the client is stale.
    pub expected_question_count: Option<u32>,
}

/// POST /api/v1/interviews
///
/// Starts a session. Selecting a stored resume is mandatory once the user has any.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    user: UserId,
    Json(request): Json<StartInterview>,
) -> Result<Json<TurnResult>, AppError> {
    let resume_text =
        select_resume_text(state.history.as_ref(), &user, request.resume_id, true).await?;

    let result = state
        .interviews
        .start(&user, &request.job_description, resume_text, request.mode)
        .await?;
    Ok(Json(result))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.interviews.snapshot(&user, id).await?))
}

/// POST /api/v1/interviews/:id/turns
pub async fn handle_submit_turn(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitTurnRequest>,
) -> Result<Json<TurnResult>, AppError> {
    let result = state
        .interviews
        .respond(&user, id, &request.answer, request.expected_question_count)
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/interviews/:id/end
pub async fn handle_end_interview(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnResult>, AppError> {
    Ok(Json(state.interviews.end(&user, id).await?))
}

/// POST /api/v1/interviews/:id/save
///
/// Retries the history write for a completed session whose first write failed.
pub async fn handle_save_interview(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnResult>, AppError> {
    Ok(Json(state.interviews.save(&user, id).await?))
}
