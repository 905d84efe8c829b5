//! Local guard between the interviewer model and the session.
//!
//! Field-level checks (score range, empty question iff terminal) run in
//! `InterviewTurnOutput::validate` during structured invocation. This module adds the
//! session-level rule: the model may not keep the interview going past the question
//! ceiling.

use tracing::warn;

use crate::interview::flow::InterviewTurnOutput;
use crate::interview::session::CompletionReason;

pub const DEFAULT_QUESTION_CEILING: u32 = 10;

const CEILING_NOTE: &str =
    "The interview reached its maximum number of questions and was ended automatically. \
     The final score is the average of your per-question scores.";

/// A validated reply, reduced to what the session needs to apply it.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Continue {
        feedback: String,
        score: f64,
        next_question: String,
        summary: String,
    },
    Finish {
        feedback: String,
        final_score: f64,
        reason: CompletionReason,
        summary: String,
    },
}

/// Decides how a schema-valid reply is applied.
///
/// `question_count` is the number of questions asked so far and `turn_scores` the
/// scores of earlier non-terminal turns. A non-terminal reply at or past `ceiling`
/// is converted into a forced finish scored by the mean of every per-turn score.
pub fn resolve(
    reply: InterviewTurnOutput,
    question_count: u32,
    turn_scores: &[f64],
    ceiling: u32,
) -> TurnOutcome {
    if reply.is_interview_over {
        return TurnOutcome::Finish {
            feedback: reply.feedback,
            final_score: reply.score,
            reason: CompletionReason::Model,
            summary: reply.conversation_history,
        };
    }

    if question_count >= ceiling {
        warn!(
            "Interviewer asked past the {ceiling}-question ceiling; forcing completion"
        );
        let total: f64 = turn_scores.iter().sum::<f64>() + reply.score;
        let final_score = total / (turn_scores.len() + 1) as f64;
        let feedback = if reply.feedback.trim().is_empty() {
            CEILING_NOTE.to_string()
        } else {
            format!("{}\n\n{CEILING_NOTE}", reply.feedback.trim())
        };
        return TurnOutcome::Finish {
            feedback,
            final_score,
            reason: CompletionReason::QuestionCeiling,
            summary: reply.conversation_history,
        };
    }

    TurnOutcome::Continue {
        feedback: reply.feedback,
        score: reply.score,
        next_question: reply.next_question.trim().to_string(),
        summary: reply.conversation_history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(score: f64, next: &str, over: bool) -> InterviewTurnOutput {
        InterviewTurnOutput {
            feedback: "Clear answer.".to_string(),
            score,
            next_question: next.to_string(),
            conversation_history: "so far".to_string(),
            is_interview_over: over,
        }
    }

    #[test]
    fn test_non_terminal_reply_below_ceiling_continues() {
        let outcome = resolve(reply(70.0, "  Next?  ", false), 3, &[60.0, 80.0], 10);
        assert_eq!(
            outcome,
            TurnOutcome::Continue {
                feedback: "Clear answer.".to_string(),
                score: 70.0,
                next_question: "Next?".to_string(),
                summary: "so far".to_string(),
            }
        );
    }

    #[test]
    fn test_terminal_reply_keeps_model_aggregate() {
        match resolve(reply(77.0, "", true), 5, &[10.0], 10) {
            TurnOutcome::Finish {
                final_score, reason, ..
            } => {
                assert_eq!(final_score, 77.0);
                assert_eq!(reason, CompletionReason::Model);
            }
            other => panic!("expected finish, got {other:?}"),
        }
    }

    #[test]
    fn test_ceiling_forces_finish_with_mean_score() {
        match resolve(reply(90.0, "Another one?", false), 3, &[60.0, 90.0], 3) {
            TurnOutcome::Finish {
                feedback,
                final_score,
                reason,
                ..
            } => {
                assert_eq!(final_score, 80.0);
                assert_eq!(reason, CompletionReason::QuestionCeiling);
                assert!(feedback.starts_with("Clear answer."));
                assert!(feedback.ends_with(CEILING_NOTE));
            }
            other => panic!("expected finish, got {other:?}"),
        }
    }
}
