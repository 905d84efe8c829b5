//! Caller identity.
//!
//! Authentication happens upstream; the identity provider's stable user id arrives
//! in the `X-User-Id` header. Every history and session operation is scoped to it.

use std::fmt;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
const MAX_USER_ID_LEN: usize = 128;

/// Opaque, stable user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= MAX_USER_ID_LEN
            && trimmed.chars().all(|c| c.is_ascii_graphic());
        valid.then(|| UserId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(UserId::parse)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_parse_trims_and_accepts_firebase_style_uid() {
        let id = UserId::parse("  aZ09xYqP3sLkT8uV2wRn  ").unwrap();
        assert_eq!(id.as_str(), "aZ09xYqP3sLkT8uV2wRn");
    }

    #[test]
    fn test_parse_rejects_blank_and_whitespace_inside() {
        assert!(UserId::parse("   ").is_none());
        assert!(UserId::parse("user one").is_none());
        assert!(UserId::parse(&"x".repeat(MAX_USER_ID_LEN + 1)).is_none());
    }

    #[tokio::test]
    async fn test_extractor_requires_header() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let result = UserId::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));

        let (mut parts, _) = Request::builder()
            .header(USER_ID_HEADER, "user-42")
            .body(())
            .unwrap()
            .into_parts();
        let id = UserId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id.as_str(), "user-42");
    }
}
