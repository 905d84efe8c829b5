pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::flows::handlers as flows;
use crate::history::handlers as history;
use crate::interview::handlers as interviews;
use crate::state::AppState;

/// Request body cap. Resumes arrive base64-encoded inside JSON.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation flows
        .route("/api/v1/posts/generate", post(flows::handle_generate_post))
        .route("/api/v1/resumes/analyze", post(flows::handle_analyze_resume))
        .route(
            "/api/v1/roadmaps/generate",
            post(flows::handle_generate_roadmap),
        )
        .route(
            "/api/v1/resumes",
            get(flows::handle_list_resumes).post(flows::handle_upload_resume),
        )
        // Mock interviewer
        .route(
            "/api/v1/interviews",
            post(interviews::handle_start_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interviews::handle_get_interview),
        )
        .route(
            "/api/v1/interviews/:id/turns",
            post(interviews::handle_submit_turn),
        )
        .route(
            "/api/v1/interviews/:id/end",
            post(interviews::handle_end_interview),
        )
        .route(
            "/api/v1/interviews/:id/save",
            post(interviews::handle_save_interview),
        )
        // History
        .route(
            "/api/v1/history/:collection",
            get(history::handle_list_history).delete(history::handle_delete_history),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::history::MemoryHistoryStore;
    use crate::llm_client::testing::{interview_reply, ScriptedBackend};
    use crate::llm_client::LlmError;

    const JD: &str = "Backend engineer to build async Rust services on PostgreSQL and Kafka.";

    fn app(backend: Arc<ScriptedBackend>) -> Router {
        let state = AppState::new(
            backend,
            Arc::new(MemoryHistoryStore::new()),
            &Config::for_tests(),
        );
        build_router(state)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", "user-42");
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app(Arc::new(ScriptedBackend::new(vec![])));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "careerflow-api");
    }

    #[tokio::test]
    async fn test_api_requires_user_header() {
        let app = app(Arc::new(ScriptedBackend::new(vec![])));
        let req = Request::builder()
            .uri("/api/v1/history/posts")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_generated_post_is_saved_and_listed() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(
            json!({"post": "We cut p99 latency in half. #Rust"}).to_string(),
        )]));
        let app = app(backend);

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/posts/generate",
                Some(json!({
                    "projectDetails": "Rewrote the ingest service in Rust with tokio",
                    "tone": "professional"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["record_id"].is_string());
        assert!(body["persistence_error"].is_null());

        let (status, body) = send(&app, request("GET", "/api/v1/history/posts", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
        assert_eq!(body["records"][0]["tone"], "professional");
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let app = app(Arc::new(ScriptedBackend::new(vec![])));
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/roadmaps/generate",
                Some(json!({"targetRole": "SRE", "jobDescription": "too short"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generation_timeout_maps_to_504() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(LlmError::Timeout(
            Duration::from_secs(45),
        ))]));
        let app = app(backend);
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/roadmaps/generate",
                Some(json!({"targetRole": "Data Engineer", "jobDescription": JD})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"]["code"], "GENERATION_TIMEOUT");
    }

    #[tokio::test]
    async fn test_resume_analysis_from_data_uri() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(json!({
            "overallScore": 81,
            "studentProjectPortfolioScore": 75,
            "technicalKnowledgeScore": 85,
            "keywordScore": 80,
            "keywordMatches": ["Rust"],
            "keywordGaps": ["Kafka"],
            "suggestions": "Nice work.\n1. Add Kafka: describe any streaming work.\n2. Quantify: add metrics."
        })
        .to_string())]));
        let app = app(backend.clone());
        let uri = format!(
            "data:text/plain;base64,{}",
            STANDARD.encode("Jane Doe. Rust, PostgreSQL, tokio.")
        );

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/resumes/analyze",
                Some(json!({"resumeDataUri": uri, "jobDescription": JD})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallScore"], 81.0);
        assert_eq!(body["parsed_suggestions"]["items"].as_array().unwrap().len(), 2);
        assert!(backend.last_prompt().unwrap().contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_interview_over_http() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            interview_reply("Welcome", 0.0, "Introduce a project you are proud of.", "", false),
            interview_reply("Thanks", 66.0, "", "wrap-up", true),
        ]));
        let app = app(backend);

        let (status, body) = send(
            &app,
            request("POST", "/api/v1/interviews", Some(json!({"job_description": JD}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["question_count"], 1);
        let id = body["session"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            request(
                "POST",
                &format!("/api/v1/interviews/{id}/turns"),
                Some(json!({"answer": "I built a rate limiter in Rust.", "expected_question_count": 1})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["is_over"], true);
        assert!(body["save"]["record_id"].is_string());

        let (status, _) = send(
            &app,
            request("POST", &format!("/api/v1/interviews/{id}/turns"), Some(json!({"answer": "One more answer please"}))),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, request("GET", "/api/v1/history/interviews", None)).await;
        assert_eq!(body["records"][0]["final_score"], 66.0);
        assert_eq!(body["records"][0]["transcript_lines"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_delete_is_all_or_nothing() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(
            json!({"learningRoadmap": "**Week 1: Basics**\nRead the book."}).to_string(),
        )]));
        let app = app(backend);
        let (_, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/roadmaps/generate",
                Some(json!({"targetRole": "Data Engineer", "jobDescription": JD})),
            ),
        )
        .await;
        let id = body["record_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            request(
                "DELETE",
                "/api/v1/history/roadmaps",
                Some(json!({"ids": [id, uuid::Uuid::new_v4()]})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            request("DELETE", "/api/v1/history/roadmaps", Some(json!({"ids": [id]}))),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, request("GET", "/api/v1/history/roadmaps", None)).await;
        assert!(body["records"].as_array().unwrap().is_empty());
    }
}
