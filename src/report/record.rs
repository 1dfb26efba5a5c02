//! @ai:module:intent Combined analysis record returned to callers and persisted
//! @ai:module:layer domain
//! @ai:module:public_api AnalysisReport
//! @ai:module:stateless true

use crate::model::{Language, Mode, ToolKind, ToolResult};
use crate::scoring::ScoredResult;
use serde::Serialize;

/// @ai:intent Scores plus raw per-tool sections for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub model: String,
    pub language: Language,
    pub mode: Mode,
    /// The extracted block that was analyzed
    pub generated_code: String,
    #[serde(flatten)]
    pub scores: ScoredResult,
    pub tools: Vec<ToolResult>,
    /// RFC 3339
    pub timestamp: String,
}

impl AnalysisReport {
    /// @ai:intent Result for one analyzer family, if it was selected
    /// @ai:effects pure
    pub fn tool(&self, kind: ToolKind) -> Option<&ToolResult> {
        self.tools.iter().find(|t| t.tool == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_flattened_to_top_level() {
        let report = AnalysisReport {
            model: "gpt-x".to_string(),
            language: Language::Python,
            mode: Mode::Quick,
            generated_code: "print(1)".to_string(),
            scores: ScoredResult::unavailable(),
            tools: vec![ToolResult::failed(ToolKind::InterpretedStatic, "boom")],
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["language"], "Python");
        assert_eq!(json["mode"], "quick");
        assert_eq!(json["final_score"], "unavailable");
        assert_eq!(json["tools"][0]["status"], "tool_failed");
        assert!(report.tool(ToolKind::InterpretedStatic).is_some());
        assert!(report.tool(ToolKind::DynamicMemory).is_none());
    }
}
