use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::interview::guard::DEFAULT_QUESTION_CEILING;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset, history lives in process memory.
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Overall deadline for one structured LLM invocation, retries included.
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    /// Hard local ceiling on interview questions, regardless of what the model decides.
    pub interview_max_questions: u32,
    /// Idle interview sessions older than this are evicted.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: Duration::from_secs(env_or("LLM_TIMEOUT_SECS", 45)?),
            llm_max_retries: env_or("LLM_MAX_RETRIES", 3)?,
            interview_max_questions: env_or("INTERVIEW_MAX_QUESTIONS", DEFAULT_QUESTION_CEILING)?,
            session_ttl: Duration::from_secs(60 * env_or::<u64>("SESSION_TTL_MINUTES", 120)?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            llm_timeout: Duration::from_secs(5),
            llm_max_retries: 1,
            interview_max_questions: 10,
            session_ttl: Duration::from_secs(60 * 120),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u32 = env_or("CAREERFLOW_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("CAREERFLOW_TEST_BAD_NUMBER", "seven");
        let result: Result<u32> = env_or("CAREERFLOW_TEST_BAD_NUMBER", 7);
        assert!(result.is_err());
        std::env::remove_var("CAREERFLOW_TEST_BAD_NUMBER");
    }
}
