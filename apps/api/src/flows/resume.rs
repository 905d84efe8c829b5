//! Resume analysis flow: `{resume text, jobDescription} -> scores + suggestions`.

use serde::{Deserialize, Serialize};

use crate::flows::prompts::{RESUME_PROMPT_TEMPLATE, RESUME_SYSTEM};
use crate::llm_client::prompts::{fill_template, json_contract, INJECTION_GUARD};
use crate::llm_client::structured::{check_score, invoke, FlowSchema, GenerationError};
use crate::llm_client::LlmBackend;
use crate::models::history::ResumeAnalysisRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeOutput {
    pub overall_score: f64,
    pub student_project_portfolio_score: f64,
    pub technical_knowledge_score: f64,
    pub keyword_score: f64,
    #[serde(default)]
    pub keyword_matches: Vec<String>,
    #[serde(default)]
    pub keyword_gaps: Vec<String>,
    pub suggestions: String,
}

impl FlowSchema for AnalyzeResumeOutput {
    const FLOW: &'static str = "analyzeResume";

    fn validate(&self) -> Result<(), String> {
        check_score("overallScore", self.overall_score)?;
        check_score(
            "studentProjectPortfolioScore",
            self.student_project_portfolio_score,
        )?;
        check_score("technicalKnowledgeScore", self.technical_knowledge_score)?;
        check_score("keywordScore", self.keyword_score)?;
        if self.suggestions.trim().is_empty() {
            return Err("suggestions must not be empty".to_string());
        }
        Ok(())
    }
}

impl AnalyzeResumeOutput {
    pub fn into_record(self, job_description: &str) -> ResumeAnalysisRecord {
        ResumeAnalysisRecord {
            overall_score: self.overall_score,
            student_project_portfolio_score: self.student_project_portfolio_score,
            technical_knowledge_score: self.technical_knowledge_score,
            keyword_score: self.keyword_score,
            keyword_matches: self.keyword_matches,
            keyword_gaps: self.keyword_gaps,
            suggestions: self.suggestions,
            job_description: job_description.to_string(),
        }
    }
}

pub fn build_resume_prompt(resume_text: &str, job_description: &str) -> String {
    let contract = json_contract(&[
        ("overallScore", "number 0-100, weighted average of the three scores"),
        ("studentProjectPortfolioScore", "number 0-100"),
        ("technicalKnowledgeScore", "number 0-100"),
        ("keywordScore", "number 0-100"),
        ("keywordMatches", "array of strings, job keywords the resume covers"),
        ("keywordGaps", "array of strings, critical job keywords the resume lacks"),
        ("suggestions", "string, intro sentence then a numbered list"),
    ]);

    fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("injection_guard", INJECTION_GUARD),
            ("json_contract", contract.as_str()),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}

pub async fn analyze_resume(
    llm: &dyn LlmBackend,
    resume_text: &str,
    job_description: &str,
) -> Result<AnalyzeResumeOutput, GenerationError> {
    let prompt = build_resume_prompt(resume_text, job_description);
    invoke(llm, &prompt, RESUME_SYSTEM).await
}
