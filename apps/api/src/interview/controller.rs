//! Interview session controller.
//!
//! Owns every live session. Each session sits behind its own async mutex, and a turn
//! takes it with `try_lock`: a second submission while a model call is in flight is a
//! conflict, never a queued duplicate. A turn mutates the session only after the
//! reply has passed structured validation and the guard.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::auth::UserId;
use crate::errors::AppError;
use crate::flows::validation::{self, require_text, MIN_ANSWER_CHARS};
use crate::history::store::{append_record, HistoryStore, SaveOutcome};
use crate::interview::flow::{advance_interview, AdvanceInterviewInput};
use crate::interview::guard::resolve;
use crate::interview::prompts::{END_UTTERANCE, OPENING_QUESTION, OPENING_UTTERANCE};
use crate::interview::session::{
    CompletionReason, InteractionMode, InterviewSession, Message, SessionState,
};
use crate::llm_client::LlmBackend;

/// Messages of explicit transcript sent with each turn.
pub const TRANSCRIPT_WINDOW: usize = 12;

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub state: SessionState,
    pub mode: InteractionMode,
    pub question_count: u32,
    pub current_question: String,
    pub last_score: f64,
    pub last_feedback: String,
    pub is_over: bool,
    pub completion: Option<CompletionReason>,
    pub record_id: Option<Uuid>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&InterviewSession> for SessionView {
    fn from(session: &InterviewSession) -> Self {
        Self {
            id: session.id,
            state: session.state,
            mode: session.mode,
            question_count: session.question_count,
            current_question: session.current_question.clone(),
            last_score: session.last_score,
            last_feedback: session.last_feedback.clone(),
            is_over: session.is_over(),
            completion: session.completion,
            record_id: session.record_id,
            messages: session.messages.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Session state after an operation, plus the history write result when the
/// operation completed the session.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub session: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveOutcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartInterview {
    pub job_description: String,
    #[serde(default)]
    pub mode: InteractionMode,
    /// Selected stored resume. Resolved to text by the caller.
    pub resume_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Entry {
    owner: UserId,
    session: Arc<Mutex<InterviewSession>>,
    /// Last published view, served while a turn holds the session.
    view: Arc<RwLock<SessionView>>,
}

pub struct InterviewController {
    llm: Arc<dyn LlmBackend>,
    history: Arc<dyn HistoryStore>,
    sessions: RwLock<HashMap<Uuid, Entry>>,
    question_ceiling: u32,
    session_ttl: Duration,
}

impl InterviewController {
    pub fn new(
        llm: Arc<dyn LlmBackend>,
        history: Arc<dyn HistoryStore>,
        question_ceiling: u32,
        session_ttl: Duration,
    ) -> Self {
        Self {
            llm,
            history,
            sessions: RwLock::new(HashMap::new()),
            question_ceiling: question_ceiling.max(1),
            session_ttl,
        }
    }

    /// `NotStarted -> InProgress`: sends the synthetic opening and stores the
    /// session only if the model replied with a valid first question.
    pub async fn start(
        &self,
        user: &UserId,
        job_description: &str,
        resume_text: Option<String>,
        mode: InteractionMode,
    ) -> Result<TurnResult, AppError> {
        let job_description = validation::job_description(job_description)?.to_string();
        self.prune_idle().await;

        let mut session = InterviewSession::new(user.clone(), job_description, resume_text, mode);

        let reply = {
            let input = AdvanceInterviewInput {
                job_description: &session.job_description,
                resume_text: session.resume_text.as_deref(),
                user_response: OPENING_UTTERANCE,
                interview_question: OPENING_QUESTION,
                previous_conversation: None,
                question_count: 0,
            };
            advance_interview(self.llm.as_ref(), &input).await?
        };
        let outcome = resolve(reply, 0, &[], self.question_ceiling);
        session.begin(outcome);

        info!(
            "Started interview {} for user {user} ({:?})",
            session.id, session.state
        );
        let result = TurnResult {
            session: SessionView::from(&session),
            save: None,
        };

        self.sessions.write().await.insert(
            session.id,
            Entry {
                owner: user.clone(),
                session: Arc::new(Mutex::new(session)),
                view: Arc::new(RwLock::new(result.session.clone())),
            },
        );
        Ok(result)
    }

    /// `InProgress -> InProgress | Completed` for one candidate answer.
    pub async fn respond(
        &self,
        user: &UserId,
        id: Uuid,
        answer: &str,
        expected_question_count: Option<u32>,
    ) -> Result<TurnResult, AppError> {
        let answer = require_text("answer", answer, MIN_ANSWER_CHARS)?.to_string();
        let mut session = self.lock_for_turn(user, id).await?;

        if let Some(expected) = expected_question_count {
            if expected != session.question_count {
                return Err(AppError::Conflict(format!(
                    "Interview is at question {}, not {expected}",
                    session.question_count
                )));
            }
        }

        let result = self.run_turn(&mut session, &answer).await?;
        self.publish(&result.session).await;
        Ok(result)
    }

    /// Ends the session on the candidate's request by submitting the end utterance.
    pub async fn end(&self, user: &UserId, id: Uuid) -> Result<TurnResult, AppError> {
        let mut session = self.lock_for_turn(user, id).await?;
        let result = self.run_turn(&mut session, END_UTTERANCE).await?;
        self.publish(&result.session).await;
        Ok(result)
    }

    /// Retries the history write of a completed session. Idempotent once saved.
    pub async fn save(&self, user: &UserId, id: Uuid) -> Result<TurnResult, AppError> {
        let mut session = self.lock(user, id).await?;

        if !session.is_over() {
            return Err(AppError::Conflict(
                "Interview is still in progress".to_string(),
            ));
        }
        if session.completion == Some(CompletionReason::OpeningTurn) {
            return Err(AppError::Conflict(
                "Interview ended before any question was asked; there is nothing to save"
                    .to_string(),
            ));
        }

        let save = match session.record_id {
            Some(record_id) => SaveOutcome::saved(record_id),
            None => self.persist(&mut session).await,
        };
        let result = TurnResult {
            session: SessionView::from(&*session),
            save: Some(save),
        };
        self.publish(&result.session).await;
        Ok(result)
    }

    /// Current view of a session. Never waits on an in-flight turn: while one holds
    /// the session, the view published by the last completed operation is returned.
    pub async fn snapshot(&self, user: &UserId, id: Uuid) -> Result<SessionView, AppError> {
        let entry = self.entry(user, id).await?;
        let view = match entry.session.try_lock() {
            Ok(session) => SessionView::from(&*session),
            Err(_) => entry.view.read().await.clone(),
        };
        Ok(view)
    }

    /// Drops sessions idle for longer than the TTL. Sessions mid-turn are kept.
    pub async fn prune_idle(&self) -> usize {
        let now = Utc::now();
        let ttl = self.session_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, entry| match entry.session.try_lock() {
            Ok(session) => (now - session.updated_at)
                .to_std()
                .map(|idle| idle <= ttl)
                .unwrap_or(true),
            Err(_) => true,
        });

        let pruned = before - sessions.len();
        if pruned > 0 {
            info!("Pruned {pruned} idle interview session(s)");
        }
        pruned
    }

    async fn run_turn(
        &self,
        session: &mut InterviewSession,
        answer: &str,
    ) -> Result<TurnResult, AppError> {
        let reply = {
            let previous = previous_conversation(session);
            let input = AdvanceInterviewInput {
                job_description: &session.job_description,
                resume_text: session.resume_text.as_deref(),
                user_response: answer,
                interview_question: &session.current_question,
                previous_conversation: Some(previous),
                question_count: session.question_count,
            };
            advance_interview(self.llm.as_ref(), &input).await?
        };

        let outcome = resolve(
            reply,
            session.question_count,
            &session.turn_scores(),
            self.question_ceiling,
        );
        session.record_turn(answer, outcome);

        let save = if session.needs_persisting() {
            info!(
                "Interview {} completed after {} question(s) with score {}",
                session.id, session.question_count, session.last_score
            );
            Some(self.persist(session).await)
        } else {
            None
        };

        Ok(TurnResult {
            session: SessionView::from(&*session),
            save,
        })
    }

    async fn persist(&self, session: &mut InterviewSession) -> SaveOutcome {
        let result = append_record(self.history.as_ref(), &session.owner, &session.to_record()).await;
        if let Ok(record_id) = &result {
            session.record_id = Some(*record_id);
        }
        SaveOutcome::from_result(result, "interview")
    }

    async fn entry(&self, user: &UserId, id: Uuid) -> Result<Entry, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|entry| &entry.owner == user)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
    }

    /// Called while the session guard is still held.
    async fn publish(&self, view: &SessionView) {
        let entry = self.sessions.read().await.get(&view.id).cloned();
        if let Some(entry) = entry {
            *entry.view.write().await = view.clone();
        }
    }

    async fn lock(
        &self,
        user: &UserId,
        id: Uuid,
    ) -> Result<OwnedMutexGuard<InterviewSession>, AppError> {
        self.entry(user, id).await?.session.try_lock_owned().map_err(|_| {
            AppError::Conflict("A turn is already being processed for this interview".to_string())
        })
    }

    /// Locks a session that can still accept a turn.
    async fn lock_for_turn(
        &self,
        user: &UserId,
        id: Uuid,
    ) -> Result<OwnedMutexGuard<InterviewSession>, AppError> {
        let session = self.lock(user, id).await?;
        if session.is_over() {
            return Err(AppError::Conflict(
                "Interview is already over; start a new one".to_string(),
            ));
        }
        Ok(session)
    }
}

fn previous_conversation(session: &InterviewSession) -> String {
    let recent = session.recent_transcript(TRANSCRIPT_WINDOW);
    if session.conversation_summary.trim().is_empty() {
        recent
    } else {
        format!(
            "Running summary: {}\n\nRecent transcript:\n{}",
            session.conversation_summary.trim(),
            recent
        )
    }
}
