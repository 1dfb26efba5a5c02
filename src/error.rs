//! @ai:module:intent Error taxonomy for the analysis pipeline
//! @ai:module:layer domain
//! @ai:module:public_api AnalysisError, ToolError, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Request-level failures surfaced to callers
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Missing code or language; user-visible
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Unexpected failure anywhere in the pipeline; details stay in the logs
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// @ai:intent Failures normalized at the adapter boundary; never fatal to a request
#[derive(Error, Debug)]
pub enum ToolError {
    /// Binary not found on PATH or service unreachable
    #[error("{tool} not available: {detail}")]
    Unavailable { tool: String, detail: String },

    /// Non-zero exit, malformed output, or unsupported input
    #[error("{tool} failed: {detail}")]
    Execution { tool: String, detail: String },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },
}

impl ToolError {
    /// @ai:intent Shorthand for an execution failure
    /// @ai:effects pure
    pub fn execution(tool: &str, detail: impl std::fmt::Display) -> Self {
        ToolError::Execution {
            tool: tool.to_string(),
            detail: detail.to_string(),
        }
    }

    /// @ai:intent Shorthand for a missing tool
    /// @ai:effects pure
    pub fn unavailable(tool: &str, detail: impl std::fmt::Display) -> Self {
        ToolError::Unavailable {
            tool: tool.to_string(),
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
