//! @ai:module:intent Inbound analysis request and its validation
//! @ai:module:layer domain
//! @ai:module:public_api Mode, AnalysisRequest, AnalyzePayload
//! @ai:module:stateless true

use crate::error::AnalysisError;
use crate::model::Language;
use serde::{Deserialize, Serialize};

/// @ai:intent Analysis depth requested by the caller
/// @ai:effects pure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Static analyzers only
    #[default]
    #[serde(alias = "mode_1")]
    Quick,
    /// Static plus dynamic-memory and formal-verification analyzers
    #[serde(alias = "mode_2")]
    Full,
}

impl Mode {
    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Quick => "quick",
            Mode::Full => "full",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Raw JSON body of POST /analyze, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzePayload {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub generated_code: Option<String>,
    #[serde(default)]
    pub dafny_text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// @ai:intent A validated request owned by exactly one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub mode: Mode,
    /// Opaque model identifier, passed through unchanged
    pub model: String,
    pub code_text: String,
    pub verification_text: Option<String>,
    pub language: Language,
}

impl TryFrom<AnalyzePayload> for AnalysisRequest {
    type Error = AnalysisError;

    /// @ai:intent Validate the raw payload
    /// @ai:pre none
    /// @ai:post code_text and language are non-empty
    /// @ai:effects pure
    fn try_from(payload: AnalyzePayload) -> Result<Self, Self::Error> {
        let code_text = payload.generated_code.unwrap_or_default();
        let language = payload.language.unwrap_or_default();

        if code_text.trim().is_empty() || language.trim().is_empty() {
            return Err(AnalysisError::InputValidation(
                "Output and language fields are required".to_string(),
            ));
        }

        Ok(Self {
            mode: payload.mode,
            model: payload.model.unwrap_or_default(),
            code_text,
            verification_text: payload.dafny_text,
            language: Language::from_display_name(&language),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_accepts_legacy_names() {
        let quick: Mode = serde_json::from_str("\"mode_1\"").unwrap();
        let full: Mode = serde_json::from_str("\"mode_2\"").unwrap();
        assert_eq!(quick, Mode::Quick);
        assert_eq!(full, Mode::Full);
        assert_eq!(serde_json::to_string(&Mode::Full).unwrap(), "\"full\"");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<Mode>("\"turbo\"").is_err());
    }

    #[test]
    fn test_payload_missing_mode_defaults_to_quick() {
        let payload: AnalyzePayload =
            serde_json::from_str(r#"{"generated_code": "x = 1", "language": "Python"}"#).unwrap();
        let request = AnalysisRequest::try_from(payload).unwrap();
        assert_eq!(request.mode, Mode::Quick);
        assert_eq!(request.language, Language::Python);
        assert!(request.verification_text.is_none());
    }

    #[test]
    fn test_missing_code_or_language_is_invalid() {
        let no_code = AnalyzePayload {
            language: Some("Python".to_string()),
            ..Default::default()
        };
        let no_language = AnalyzePayload {
            generated_code: Some("print(1)".to_string()),
            language: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            AnalysisRequest::try_from(no_code),
            Err(AnalysisError::InputValidation(_))
        ));
        assert!(matches!(
            AnalysisRequest::try_from(no_language),
            Err(AnalysisError::InputValidation(_))
        ));
    }
}
