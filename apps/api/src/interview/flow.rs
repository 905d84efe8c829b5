//! The `advanceInterview` flow: one candidate response in, one interviewer reply out.

use serde::{Deserialize, Serialize};

use crate::interview::prompts::{INTERVIEW_PROMPT_TEMPLATE, INTERVIEW_SYSTEM};
use crate::llm_client::prompts::{fill_template, json_contract, INJECTION_GUARD};
use crate::llm_client::structured::{check_score, invoke, FlowSchema, GenerationError};
use crate::llm_client::LlmBackend;

#[derive(Debug, Clone)]
pub struct AdvanceInterviewInput<'a> {
    pub job_description: &'a str,
    pub resume_text: Option<&'a str>,
    pub user_response: &'a str,
    pub interview_question: &'a str,
    pub previous_conversation: Option<String>,
    pub question_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTurnOutput {
    pub feedback: String,
    pub score: f64,
    #[serde(default)]
    pub next_question: String,
    #[serde(default)]
    pub conversation_history: String,
    pub is_interview_over: bool,
}

impl FlowSchema for InterviewTurnOutput {
    const FLOW: &'static str = "advanceInterview";

    fn validate(&self) -> Result<(), String> {
        check_score("score", self.score)?;

        let has_question = !self.next_question.trim().is_empty();
        match (self.is_interview_over, has_question) {
            (true, true) => Err("nextQuestion must be empty when isInterviewOver is true".to_string()),
            (false, false) => {
                Err("nextQuestion must not be empty while the interview continues".to_string())
            }
            _ => Ok(()),
        }
    }
}

pub fn build_interview_prompt(input: &AdvanceInterviewInput<'_>) -> String {
    let contract = json_contract(&[
        ("feedback", "string, feedback on the latest response (or the final summary)"),
        ("score", "number 0-100"),
        ("nextQuestion", "string, empty only when the interview is over"),
        ("conversationHistory", "string, brief running summary"),
        ("isInterviewOver", "boolean"),
    ]);
    let resume_section = match input.resume_text {
        Some(text) if !text.trim().is_empty() => format!("Candidate resume:\n{}\n", text.trim()),
        _ => String::new(),
    };
    let previous = input
        .previous_conversation
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or("(the interview is just starting)");

    let question_count = input.question_count.to_string();
    fill_template(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("injection_guard", INJECTION_GUARD),
            ("question_count", question_count.as_str()),
            ("json_contract", contract.as_str()),
            ("job_description", input.job_description),
            ("resume_section", resume_section.as_str()),
            ("previous_conversation", previous),
            ("interview_question", input.interview_question),
            ("user_response", input.user_response),
        ],
    )
}

pub async fn advance_interview(
    llm: &dyn LlmBackend,
    input: &AdvanceInterviewInput<'_>,
) -> Result<InterviewTurnOutput, GenerationError> {
    let prompt = build_interview_prompt(input);
    invoke(llm, &prompt, INTERVIEW_SYSTEM).await
}
