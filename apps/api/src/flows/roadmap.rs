//! Skill-gap roadmap flow: `{targetRole, jobDescription} -> {learningRoadmap}`.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::flows::prompts::{ROADMAP_PROMPT_TEMPLATE, ROADMAP_SYSTEM};
use crate::flows::validation::{self, require_text, MIN_TARGET_ROLE_CHARS};
use crate::llm_client::prompts::{fill_template, json_contract, INJECTION_GUARD};
use crate::llm_client::structured::{invoke, FlowSchema, GenerationError};
use crate::llm_client::LlmBackend;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoadmapInput {
    pub target_role: String,
    pub job_description: String,
}

impl GenerateRoadmapInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("targetRole", &self.target_role, MIN_TARGET_ROLE_CHARS)?;
        validation::job_description(&self.job_description)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapOutput {
    pub learning_roadmap: String,
}

impl FlowSchema for RoadmapOutput {
    const FLOW: &'static str = "generateRoadmap";

    fn validate(&self) -> Result<(), String> {
        if self.learning_roadmap.trim().is_empty() {
            return Err("learningRoadmap must not be empty".to_string());
        }
        Ok(())
    }
}

pub fn build_roadmap_prompt(input: &GenerateRoadmapInput) -> String {
    let contract = json_contract(&[("learningRoadmap", "string, the Markdown roadmap")]);
    fill_template(
        ROADMAP_PROMPT_TEMPLATE,
        &[
            ("injection_guard", INJECTION_GUARD),
            ("json_contract", contract.as_str()),
            ("job_description", input.job_description.trim()),
            ("target_role", input.target_role.trim()),
        ],
    )
}

pub async fn generate_roadmap(
    llm: &dyn LlmBackend,
    input: &GenerateRoadmapInput,
) -> Result<RoadmapOutput, GenerationError> {
    let prompt = build_roadmap_prompt(input);
    invoke(llm, &prompt, ROADMAP_SYSTEM).await
}
