//! @ai:module:intent HTTP handlers for analysis, feedback and health
//! @ai:module:layer interface
//! @ai:module:public_api analyze, feedback, health_check

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::model::AnalyzePayload;
use crate::report::AnalysisReport;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// @ai:intent Body of POST /feedback
#[derive(Debug, Deserialize)]
pub struct FeedbackPayload {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub feedback: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub sent: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub tools: BTreeMap<String, bool>,
}

/// @ai:intent Analyze one generated response
/// @ai:effects fs:write, io
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzePayload>, JsonRejection>,
) -> ApiResult<Json<AnalysisReport>> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected analysis payload");
        ApiError::BadRequest("Invalid JSON format".to_string())
    })?;

    let report = state.orchestrator.analyze_payload(payload).await?;
    Ok(Json(report))
}

/// @ai:intent Forward feedback to the model provider
/// @ai:effects network
pub async fn feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackPayload>, JsonRejection>,
) -> ApiResult<Json<FeedbackResponse>> {
    let Json(payload) =
        payload.map_err(|_| ApiError::BadRequest("Invalid JSON format".to_string()))?;

    let (Some(model), Some(feedback)) = (
        payload.model.filter(|m| !m.trim().is_empty()),
        payload.feedback,
    ) else {
        return Err(ApiError::BadRequest(
            "Model and feedback fields are required".to_string(),
        ));
    };

    info!(model = %model, "Forwarding feedback");

    match state.feedback.send(&model, &feedback).await {
        Ok(true) => Ok(Json(FeedbackResponse { sent: true })),
        Ok(false) => Err(ApiError::Upstream(
            "Feedback provider rejected the request".to_string(),
        )),
        Err(e) => {
            warn!(error = %e, "Feedback provider unreachable");
            Err(ApiError::Upstream("Feedback provider unreachable".to_string()))
        }
    }
}

/// @ai:intent Liveness plus tool availability
/// @ai:effects pure
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        tools: state.toolchain.tools.clone(),
    })
}
