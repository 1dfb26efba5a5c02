//! @ai:module:intent HTTP surface: routes, shared state and error mapping
//! @ai:module:layer interface
//! @ai:module:public_api create_router, serve, AppState, ApiError
//! @ai:module:depends_on orchestrator, feedback, toolchain

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// @ai:intent Build the router with tracing middleware
/// @ai:effects pure
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/feedback", post(handlers::feedback))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// @ai:intent Bind and serve until the process is stopped
/// @ai:effects network
pub async fn serve(state: AppState, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AdapterSet;
    use crate::config::ServiceConfig;
    use crate::feedback::MockFeedbackClient;
    use crate::orchestrator::Orchestrator;
    use crate::report::MemoryResultSink;
    use crate::toolchain::ToolchainStatus;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state_with(temp_dir: PathBuf, feedback_accepts: bool) -> AppState {
        let mut config = ServiceConfig::default();
        config.paths.temp_dir = temp_dir;

        let orchestrator = Orchestrator::new(
            Arc::new(config),
            AdapterSet::mock(),
            Arc::new(MemoryResultSink::new()),
        );

        let toolchain = ToolchainStatus {
            tools: BTreeMap::from([("valgrind".to_string(), false), ("mypy".to_string(), true)]),
            missing_tools: vec![],
        };

        AppState::new(
            Arc::new(orchestrator),
            Arc::new(MockFeedbackClient::new(feedback_accepts)),
            toolchain,
        )
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analyze_returns_scored_record() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state_with(temp.path().join("code"), true));

        let body = json!({
            "mode": "mode_1",
            "model": "gpt-x",
            "generated_code": "```python\nprint('hi')\n```",
            "language": "Python"
        });
        let (status, json) = post_json(router, "/analyze", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["model"], "gpt-x");
        assert_eq!(json["mode"], "quick");
        assert_eq!(json["weighting_tier"], "quick_pass_through");
        assert!(json["final_score"].is_number());
        assert_eq!(json["tools"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_requires_code_and_language() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state_with(temp.path().join("code"), true));

        let (status, json) =
            post_json(router, "/analyze", r#"{"generated_code": "x = 1"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Output and language fields are required");
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_json() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state_with(temp.path().join("code"), true));

        let (status, json) = post_json(router.clone(), "/analyze", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid JSON format");

        let (status, _) = post_json(
            router,
            "/analyze",
            r#"{"mode": "mode_3", "generated_code": "x", "language": "C"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let router = create_router(state_with(blocker.join("code"), true));

        let body = json!({"generated_code": "int main() {}", "language": "C"});
        let (status, json) = post_json(router, "/analyze", &body.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_feedback_forwarding() {
        let temp = TempDir::new().unwrap();

        let accepted = create_router(state_with(temp.path().join("a"), true));
        let (status, json) = post_json(
            accepted,
            "/feedback",
            r#"{"model": "gpt-x", "feedback": {"score": 9}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"sent": true}));

        let rejected = create_router(state_with(temp.path().join("b"), false));
        let (status, _) = post_json(
            rejected.clone(),
            "/feedback",
            r#"{"model": "gpt-x", "feedback": "meh"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = post_json(rejected, "/feedback", r#"{"feedback": "meh"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_tools() {
        let temp = TempDir::new().unwrap();
        let router = create_router(state_with(temp.path().join("code"), true));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["tools"]["valgrind"], false);
        assert_eq!(json["tools"]["mypy"], true);
    }
}
