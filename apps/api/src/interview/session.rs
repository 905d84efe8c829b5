//! Mock-interview session state and its transitions.
//!
//! A session moves `NotStarted -> InProgress -> Completed`. Transitions only ever
//! receive a [`TurnOutcome`] that has already passed the guard, so every method here
//! is infallible apart from being called in the wrong state.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::UserId;
use crate::interview::guard::TurnOutcome;
use crate::models::history::MockInterviewRecord;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid blank line regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// Chosen before the session starts. Recorded only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Text,
    Voice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The model ended the interview (turn limit, user request or safety refusal).
    Model,
    /// The model kept asking past the configured question ceiling.
    QuestionCeiling,
    /// The model ended the interview on the opening turn.
    OpeningTurn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Message {
    fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
            feedback: None,
            score: None,
        }
    }

    fn assistant(content: &str, feedback: Option<&str>, score: Option<f64>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
            feedback: feedback.map(str::to_string),
            score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: Uuid,
    pub owner: UserId,
    pub job_description: String,
    pub resume_text: Option<String>,
    pub mode: InteractionMode,
    pub state: SessionState,
    pub question_count: u32,
    pub current_question: String,
    /// Model-maintained running summary. Advisory; `messages` is authoritative.
    pub conversation_summary: String,
    pub last_score: f64,
    pub last_feedback: String,
    pub messages: Vec<Message>,
    pub completion: Option<CompletionReason>,
    pub record_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(
        owner: UserId,
        job_description: String,
        resume_text: Option<String>,
        mode: InteractionMode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            job_description,
            resume_text,
            mode,
            state: SessionState::NotStarted,
            question_count: 0,
            current_question: String::new(),
            conversation_summary: String::new(),
            last_score: 0.0,
            last_feedback: String::new(),
            messages: Vec::new(),
            completion: None,
            record_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Applies the reply to the synthetic opening utterance.
    /// The opening question becomes the first transcript message.
    pub fn begin(&mut self, outcome: TurnOutcome) {
        debug_assert_eq!(self.state, SessionState::NotStarted);

        match outcome {
            TurnOutcome::Continue {
                next_question,
                summary,
                ..
            } => {
                self.messages
                    .push(Message::assistant(&next_question, None, None));
                self.current_question = next_question;
                self.conversation_summary = summary;
                self.question_count = 1;
                self.state = SessionState::InProgress;
            }
            TurnOutcome::Finish {
                feedback, summary, ..
            } => {
                self.messages
                    .push(Message::assistant(&feedback, Some(&feedback), None));
                self.finish(CompletionReason::OpeningTurn, 0.0, feedback, summary);
            }
        }
        self.touch();
    }

    /// Applies one answered question.
    pub fn record_turn(&mut self, answer: &str, outcome: TurnOutcome) {
        debug_assert_eq!(self.state, SessionState::InProgress);
        self.messages.push(Message::user(answer));

        match outcome {
            TurnOutcome::Continue {
                feedback,
                score,
                next_question,
                summary,
            } => {
                self.messages.push(Message::assistant(
                    &next_question,
                    Some(&feedback),
                    Some(score),
                ));
                self.current_question = next_question;
                self.conversation_summary = summary;
                self.last_feedback = feedback;
                self.last_score = score;
                self.question_count += 1;
            }
            TurnOutcome::Finish {
                feedback,
                final_score,
                reason,
                summary,
            } => {
                self.messages.push(Message::assistant(
                    &feedback,
                    Some(&feedback),
                    Some(final_score),
                ));
                self.finish(reason, final_score, feedback, summary);
            }
        }
        self.touch();
    }

    fn finish(&mut self, reason: CompletionReason, score: f64, feedback: String, summary: String) {
        self.state = SessionState::Completed;
        self.completion = Some(reason);
        self.current_question.clear();
        self.last_score = score;
        self.last_feedback = feedback;
        if !summary.trim().is_empty() {
            self.conversation_summary = summary;
        }
    }

    /// Per-question scores from non-terminal turns, oldest first.
    pub fn turn_scores(&self) -> Vec<f64> {
        let mut scores: Vec<f64> = self.messages.iter().filter_map(|m| m.score).collect();
        if self.is_over() && self.completion != Some(CompletionReason::OpeningTurn) {
            // the last scored message carries the final aggregate
            scores.pop();
        }
        scores
    }

    /// Whether a completed session still needs its history write.
    pub fn needs_persisting(&self) -> bool {
        self.is_over()
            && self.record_id.is_none()
            && self.completion != Some(CompletionReason::OpeningTurn)
    }

    /// One `role: content` paragraph per message, paragraphs separated by a blank line.
    /// Blank lines inside a message are collapsed so each message stays one paragraph.
    pub fn render_transcript(&self) -> String {
        render(&self.messages)
    }

    /// The last `window` messages rendered as a transcript, for the prompt.
    pub fn recent_transcript(&self, window: usize) -> String {
        let skip = self.messages.len().saturating_sub(window);
        render(&self.messages[skip..])
    }

    pub fn to_record(&self) -> MockInterviewRecord {
        MockInterviewRecord {
            session_id: self.id,
            job_description: self.job_description.clone(),
            transcript: self.render_transcript(),
            final_score: self.last_score,
            final_feedback: self.last_feedback.clone(),
            question_count: self.question_count,
            completion: self.completion.unwrap_or(CompletionReason::Model),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn render(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            let content = BLANK_LINES.replace_all(m.content.trim(), "\n");
            format!("{}: {}", m.role.as_str(), content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
