//! @ai:module:intent Scriptable fake adapter for dry runs and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockAdapter, MockBehavior, Invocation
//! @ai:module:stateless false

use super::valgrind::parse_valgrind_output;
use super::{
    CompiledStaticAdapterTrait, CrossLanguageStaticAdapterTrait, DynamicMemoryAdapterTrait,
    FormalVerificationAdapterTrait, InterpretedStaticAdapterTrait,
};
use crate::error::ToolError;
use crate::model::{
    CompiledStaticReport, CrossLanguageReport, DynamicMemoryReport, FormalVerificationReport,
    Measure, ToolKind, ToolOutput,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// @ai:intent What a mocked analyzer family does when invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Return a clean canned report
    Succeed,
    /// Return ToolError::Execution with this detail
    Fail(String),
    /// Return ToolError::Unavailable
    Missing,
    /// Never finish (until the caller gives up)
    Hang,
    /// Panic inside the adapter call
    Panic,
}

/// @ai:intent One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: ToolKind,
    pub path: PathBuf,
    /// Whether the artifact existed when the adapter was called
    pub existed: bool,
}

/// @ai:intent Implements every adapter trait with per-family scripted behavior
pub struct MockAdapter {
    behaviors: HashMap<ToolKind, MockBehavior>,
    invocations: Mutex<Vec<Invocation>>,
}

impl MockAdapter {
    /// @ai:intent All families succeed
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Override one family's behavior
    /// @ai:effects pure
    pub fn with_behavior(mut self, tool: ToolKind, behavior: MockBehavior) -> Self {
        self.behaviors.insert(tool, behavior);
        self
    }

    /// @ai:intent Calls received so far, in call order
    /// @ai:effects pure
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// @ai:intent Families that were invoked at least once
    /// @ai:effects pure
    pub fn invoked_tools(&self) -> Vec<ToolKind> {
        self.invocations().into_iter().map(|i| i.tool).collect()
    }

    /// @ai:intent Record the call and apply the scripted behavior
    /// @ai:effects io
    async fn enter(&self, tool: ToolKind, path: &Path) -> Result<(), ToolError> {
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(Invocation {
                tool,
                path: path.to_path_buf(),
                existed: path.exists(),
            });
        }

        match self.behaviors.get(&tool).unwrap_or(&MockBehavior::Succeed) {
            MockBehavior::Succeed => Ok(()),
            MockBehavior::Fail(detail) => Err(ToolError::execution(tool.as_str(), detail)),
            MockBehavior::Missing => Err(ToolError::unavailable(tool.as_str(), "mock binary missing")),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(ToolError::execution(tool.as_str(), "mock hang elapsed"))
            }
            MockBehavior::Panic => panic!("{} mock adapter panicked", tool),
        }
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompiledStaticAdapterTrait for MockAdapter {
    async fn analyze(&self, path: &Path) -> Result<CompiledStaticReport, ToolError> {
        self.enter(ToolKind::CompiledStatic, path).await?;

        Ok(CompiledStaticReport {
            file: path.display().to_string(),
            status: "success".to_string(),
            command: "mock-clang-tidy".to_string(),
            return_code: Some(0),
            ..Default::default()
        })
    }
}

#[async_trait]
impl InterpretedStaticAdapterTrait for MockAdapter {
    async fn analyze(&self, path: &Path) -> Result<Vec<ToolOutput>, ToolError> {
        self.enter(ToolKind::InterpretedStatic, path).await?;

        Ok(vec![
            ToolOutput {
                tool: "mypy".to_string(),
                output: "Success: no issues found in 1 source file".to_string(),
            },
            ToolOutput {
                tool: "pylint".to_string(),
                output: "Your code has been rated at 8.00/10".to_string(),
            },
            ToolOutput {
                tool: "bandit".to_string(),
                output: "No issues identified.".to_string(),
            },
        ])
    }
}

#[async_trait]
impl CrossLanguageStaticAdapterTrait for MockAdapter {
    async fn analyze(&self, path: &Path) -> Result<CrossLanguageReport, ToolError> {
        self.enter(ToolKind::CrossLanguageStatic, path).await?;

        let measure = |metric: &str, value: &str| Measure {
            metric: metric.to_string(),
            value: value.to_string(),
        };

        Ok(CrossLanguageReport {
            components: vec![serde_json::json!({"key": "codescore", "qualifier": "TRK"})],
            measures: vec![
                measure("bugs", "0"),
                measure("vulnerabilities", "0"),
                measure("complexity", "2"),
                measure("line_coverage", "80.0"),
                measure("duplicated_lines_density", "0.0"),
            ],
        })
    }
}

#[async_trait]
impl DynamicMemoryAdapterTrait for MockAdapter {
    async fn analyze(&self, path: &Path) -> Result<DynamicMemoryReport, ToolError> {
        self.enter(ToolKind::DynamicMemory, path).await?;
        Ok(parse_valgrind_output(
            "==1== All heap blocks were freed -- no leaks are possible",
        ))
    }
}

#[async_trait]
impl FormalVerificationAdapterTrait for MockAdapter {
    async fn verify(&self, path: &Path) -> Result<FormalVerificationReport, ToolError> {
        self.enter(ToolKind::FormalVerification, path).await?;

        Ok(FormalVerificationReport {
            stdout: "Dafny program verifier finished with 1 verified, 0 errors".to_string(),
            stderr: String::new(),
            verification_status: "success".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_invocations() {
        let mock = MockAdapter::new();
        let path = Path::new("/nonexistent/a.py");

        InterpretedStaticAdapterTrait::analyze(&mock, path).await.unwrap();

        let calls = mock.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool, ToolKind::InterpretedStatic);
        assert!(!calls[0].existed);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mock = MockAdapter::new()
            .with_behavior(ToolKind::DynamicMemory, MockBehavior::Missing);

        let err = DynamicMemoryAdapterTrait::analyze(&mock, Path::new("a.c"))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Unavailable { .. }));
    }

    #[tokio::test]
    #[should_panic(expected = "mock adapter panicked")]
    async fn test_scripted_panic() {
        let mock = MockAdapter::new().with_behavior(ToolKind::CompiledStatic, MockBehavior::Panic);

        let _ = CompiledStaticAdapterTrait::analyze(&mock, Path::new("a.c")).await;
    }
}
