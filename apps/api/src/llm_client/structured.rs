//! Structured invocation: one prompt in, one schema-valid value out.
//!
//! Transport retries live in `LlmClient`. Nothing here retries: a payload that fails
//! deserialization or validation means the prompt is the problem, not the wire.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{LlmBackend, LlmError};

/// A declared output shape for one flow.
pub trait FlowSchema: DeserializeOwned {
    /// Flow name used in logs and error messages.
    const FLOW: &'static str;

    /// Semantic checks serde cannot express (ranges, cross-field rules).
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider call failed: {0}")]
    Provider(LlmError),

    #[error("{flow} returned a payload that violates its schema: {reason}")]
    Schema { flow: &'static str, reason: String },
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(after) => GenerationError::Timeout(after),
            other => GenerationError::Provider(other),
        }
    }
}

impl GenerationError {
    pub fn schema(flow: &'static str, reason: impl Into<String>) -> Self {
        GenerationError::Schema {
            flow,
            reason: reason.into(),
        }
    }
}

/// Runs one flow against the backend and returns its validated output.
pub async fn invoke<T: FlowSchema>(
    llm: &dyn LlmBackend,
    prompt: &str,
    system: &str,
) -> Result<T, GenerationError> {
    let raw = llm.complete(prompt, system).await?;
    let text = strip_json_fences(&raw);

    let value: T = serde_json::from_str(text).map_err(|e| {
        warn!("{} payload failed to deserialize: {e}", T::FLOW);
        GenerationError::schema(T::FLOW, e.to_string())
    })?;

    value.validate().map_err(|reason| {
        warn!("{} payload failed validation: {reason}", T::FLOW);
        GenerationError::schema(T::FLOW, reason)
    })?;

    debug!("{} produced a schema-valid payload", T::FLOW);
    Ok(value)
}

/// Checks that a score lies in [0, 100]. NaN and infinities are rejected.
pub fn check_score(field: &str, score: f64) -> Result<(), String> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(format!("{field} must be within [0, 100], got {score}"))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedBackend;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Scored {
        score: f64,
    }

    impl FlowSchema for Scored {
        const FLOW: &'static str = "scored";

        fn validate(&self) -> Result<(), String> {
            check_score("score", self.score)
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_check_score_bounds() {
        assert!(check_score("s", 0.0).is_ok());
        assert!(check_score("s", 100.0).is_ok());
        assert!(check_score("s", 100.5).is_err());
        assert!(check_score("s", -1.0).is_err());
        assert!(check_score("s", f64::NAN).is_err());
    }

    #[tokio::test]
    async fn test_invoke_accepts_fenced_valid_payload() {
        let backend = ScriptedBackend::new(vec![Ok("```json\n{\"score\": 72}\n```".to_string())]);
        let out: Scored = invoke(&backend, "p", "s").await.unwrap();
        assert_eq!(out.score, 72.0);
    }

    #[tokio::test]
    async fn test_invoke_rejects_out_of_range_without_retrying() {
        let backend = ScriptedBackend::new(vec![
            Ok("{\"score\": 140}".to_string()),
            Ok("{\"score\": 50}".to_string()),
        ]);
        let err = invoke::<Scored>(&backend, "p", "s").await.unwrap_err();
        assert!(matches!(err, GenerationError::Schema { flow: "scored", .. }));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invoke_rejects_malformed_json() {
        let backend = ScriptedBackend::new(vec![Ok("not json at all".to_string())]);
        let err = invoke::<Scored>(&backend, "p", "s").await.unwrap_err();
        assert!(matches!(err, GenerationError::Schema { .. }));
    }

    #[tokio::test]
    async fn test_invoke_maps_timeout() {
        let backend =
            ScriptedBackend::new(vec![Err(LlmError::Timeout(Duration::from_secs(45)))]);
        let err = invoke::<Scored>(&backend, "p", "s").await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_invoke_maps_provider_failure() {
        let backend = ScriptedBackend::new(vec![Err(LlmError::Api {
            status: 400,
            message: "bad request".to_string(),
        })]);
        let err = invoke::<Scored>(&backend, "p", "s").await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
    }
}
