use std::sync::Arc;

use crate::config::Config;
use crate::history::HistoryStore;
use crate::interview::InterviewController;
use crate::llm_client::LlmBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. `LlmClient` in production, a scripted backend in tests.
    pub llm: Arc<dyn LlmBackend>,
    /// Per-user history. Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub history: Arc<dyn HistoryStore>,
    /// Live mock-interview sessions.
    pub interviews: Arc<InterviewController>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmBackend>, history: Arc<dyn HistoryStore>, config: &Config) -> Self {
        let interviews = Arc::new(InterviewController::new(
            llm.clone(),
            history.clone(),
            config.interview_max_questions,
            config.session_ttl,
        ));
        Self {
            llm,
            history,
            interviews,
        }
    }
}
