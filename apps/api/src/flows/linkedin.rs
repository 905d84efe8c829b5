//! LinkedIn post flow: `{projectDetails, tone} -> {post}`.
//!
//! Up to `RECALLED_POSTS` of the user's previous posts are fed back into the prompt so
//! new posts keep a consistent voice.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::flows::prompts::{
    POST_PROMPT_TEMPLATE, POST_SYSTEM, TONE_CASUAL, TONE_HYPE, TONE_PROFESSIONAL,
};
use crate::flows::validation::{require_text, MIN_PROJECT_DETAILS_CHARS};
use crate::llm_client::prompts::{fill_template, json_contract, INJECTION_GUARD};
use crate::llm_client::structured::{invoke, FlowSchema, GenerationError};
use crate::llm_client::LlmBackend;

pub const RECALLED_POSTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Hype,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Hype => "hype",
        }
    }

    fn guidelines(&self) -> &'static str {
        match self {
            Tone::Professional => TONE_PROFESSIONAL,
            Tone::Casual => TONE_CASUAL,
            Tone::Hype => TONE_HYPE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePostInput {
    pub project_details: String,
    pub tone: Tone,
}

impl GeneratePostInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("projectDetails", &self.project_details, MIN_PROJECT_DETAILS_CHARS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePostOutput {
    pub post: String,
}

impl FlowSchema for GeneratePostOutput {
    const FLOW: &'static str = "generatePost";

    fn validate(&self) -> Result<(), String> {
        if self.post.trim().is_empty() {
            return Err("post must not be empty".to_string());
        }
        Ok(())
    }
}

pub fn build_post_prompt(input: &GeneratePostInput, previous_posts: &[String]) -> String {
    let previous = if previous_posts.is_empty() {
        "(none yet)".to_string()
    } else {
        previous_posts
            .iter()
            .take(RECALLED_POSTS)
            .enumerate()
            .map(|(i, post)| format!("--- Previous post {} ---\n{}", i + 1, post.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let contract = json_contract(&[("post", "string, the complete post text")]);
    fill_template(
        POST_PROMPT_TEMPLATE,
        &[
            ("injection_guard", INJECTION_GUARD),
            ("tone", input.tone.as_str()),
            ("tone_guidelines", input.tone.guidelines()),
            ("previous_posts", previous.as_str()),
            ("json_contract", contract.as_str()),
            ("project_details", input.project_details.trim()),
        ],
    )
}

pub async fn generate_post(
    llm: &dyn LlmBackend,
    input: &GeneratePostInput,
    previous_posts: &[String],
) -> Result<GeneratePostOutput, GenerationError> {
    let prompt = build_post_prompt(input, previous_posts);
    invoke(llm, &prompt, POST_SYSTEM).await
}
