//! @ai:module:intent Normalized per-tool outcomes produced by adapter invocations
//! @ai:module:layer domain
//! @ai:module:public_api ToolKind, ToolStatus, ToolResult, ToolPayload, CompiledStaticReport, ToolOutput, CrossLanguageReport, Measure, DynamicMemoryReport, FormalVerificationReport
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// @ai:intent Analyzer family an adapter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    InterpretedStatic,
    CompiledStatic,
    CrossLanguageStatic,
    DynamicMemory,
    FormalVerification,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::InterpretedStatic,
        ToolKind::CompiledStatic,
        ToolKind::CrossLanguageStatic,
        ToolKind::DynamicMemory,
        ToolKind::FormalVerification,
    ];

    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::InterpretedStatic => "interpreted_static",
            ToolKind::CompiledStatic => "compiled_static",
            ToolKind::CrossLanguageStatic => "cross_language_static",
            ToolKind::DynamicMemory => "dynamic_memory",
            ToolKind::FormalVerification => "formal_verification",
        }
    }

    /// @ai:intent Whether this analyzer contributes to the static sub-score
    /// @ai:effects pure
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            ToolKind::InterpretedStatic | ToolKind::CompiledStatic | ToolKind::CrossLanguageStatic
        )
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent How a single adapter invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Ok,
    ToolMissing,
    ToolFailed,
    NotApplicable,
}

/// @ai:intent Compiled-language static analyzer output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledStaticReport {
    pub file: String,
    pub status: String,
    pub command: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub return_code: Option<i32>,
}

/// @ai:intent One interpreted-language checker's captured output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool: String,
    pub output: String,
}

/// @ai:intent One metric reported by the cross-language analysis server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub metric: String,
    pub value: String,
}

/// @ai:intent Cross-language analysis server report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossLanguageReport {
    pub components: Vec<serde_json::Value>,
    pub measures: Vec<Measure>,
}

/// @ai:intent Dynamic memory checker findings, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicMemoryReport {
    /// "success" when the program ran under the checker, "failure" otherwise
    pub status: String,
    #[serde(default)]
    pub memory_issues: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub error_count: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DynamicMemoryReport {
    /// @ai:intent Build a failed report (compilation or checker run failed)
    /// @ai:effects pure
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: "failure".to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// @ai:intent Whether the checker itself completed
    /// @ai:effects pure
    pub fn succeeded(&self) -> bool {
        self.status == "success"
    }
}

/// @ai:intent Formal verifier output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormalVerificationReport {
    pub stdout: String,
    pub stderr: String,
    /// "success" or "failure"
    pub verification_status: String,
}

/// @ai:intent Per-tool raw payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolPayload {
    CompiledStatic(CompiledStaticReport),
    InterpretedStatic(Vec<ToolOutput>),
    CrossLanguage(CrossLanguageReport),
    DynamicMemory(DynamicMemoryReport),
    FormalVerification(FormalVerificationReport),
}

/// @ai:intent Immutable outcome of exactly one adapter invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub tool: ToolKind,
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<ToolPayload>,
    pub duration_ms: u64,
}

impl ToolResult {
    /// @ai:intent Successful invocation carrying the tool's payload
    /// @ai:effects pure
    pub fn ok(tool: ToolKind, raw: ToolPayload) -> Self {
        Self {
            tool,
            status: ToolStatus::Ok,
            reason: None,
            raw: Some(raw),
            duration_ms: 0,
        }
    }

    /// @ai:intent The tool binary or service could not be found
    /// @ai:effects pure
    pub fn missing(tool: ToolKind, reason: impl Into<String>) -> Self {
        Self::without_payload(tool, ToolStatus::ToolMissing, reason.into())
    }

    /// @ai:intent The tool ran but failed, timed out, or produced unusable output
    /// @ai:effects pure
    pub fn failed(tool: ToolKind, reason: impl Into<String>) -> Self {
        Self::without_payload(tool, ToolStatus::ToolFailed, reason.into())
    }

    /// @ai:intent The analyzer was selected but had no input to act on
    /// @ai:effects pure
    pub fn not_applicable(tool: ToolKind, marker: impl Into<String>) -> Self {
        Self::without_payload(tool, ToolStatus::NotApplicable, marker.into())
    }

    fn without_payload(tool: ToolKind, status: ToolStatus, reason: String) -> Self {
        Self {
            tool,
            status,
            reason: Some(reason),
            raw: None,
            duration_ms: 0,
        }
    }

    /// @ai:intent Attach the wall-clock duration of the invocation
    /// @ai:effects pure
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// @ai:intent Payload, only when the invocation succeeded
    /// @ai:effects pure
    pub fn payload(&self) -> Option<&ToolPayload> {
        match self.status {
            ToolStatus::Ok => self.raw.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_has_no_payload() {
        let result = ToolResult::failed(ToolKind::DynamicMemory, "timed out after 5s");
        assert_eq!(result.status, ToolStatus::ToolFailed);
        assert!(result.payload().is_none());
        assert_eq!(result.reason.as_deref(), Some("timed out after 5s"));
    }

    #[test]
    fn test_tool_result_serializes_flat_payload() {
        let result = ToolResult::ok(
            ToolKind::FormalVerification,
            ToolPayload::FormalVerification(FormalVerificationReport {
                stdout: "ok".to_string(),
                stderr: String::new(),
                verification_status: "success".to_string(),
            }),
        )
        .with_duration(12);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["tool"], "formal_verification");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["raw"]["verification_status"], "success");
        assert_eq!(json["duration_ms"], 12);
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_static_kinds() {
        let statics: Vec<_> = ToolKind::ALL.iter().filter(|k| k.is_static()).collect();
        assert_eq!(statics.len(), 3);
    }
}
