//! @ai:module:intent Map request failures onto HTTP status codes and JSON bodies
//! @ai:module:layer interface
//! @ai:module:public_api ApiError, ApiResult
//! @ai:module:stateless true

use crate::error::AnalysisError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// @ai:intent HTTP-facing errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed JSON or missing fields; message is shown to the caller
    #[error("{0}")]
    BadRequest(String),

    /// Anything unexpected; the detail stays in the logs
    #[error("Internal error: {0}")]
    Internal(String),

    /// The feedback provider could not be reached or refused the request
    #[error("{0}")]
    Upstream(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// @ai:intent Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InputValidation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
