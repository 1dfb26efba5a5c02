//! @ai:module:intent Interpreted-language static analysis: type check, lint, security scan
//! @ai:module:layer infrastructure
//! @ai:module:public_api PythonStaticAdapter
//! @ai:module:stateless true

use super::process::run_tool;
use super::InterpretedStaticAdapterTrait;
use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::model::ToolOutput;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::warn;

/// @ai:intent One checker in the fixed run order
struct Checker {
    name: &'static str,
    binary: String,
    flags: &'static [&'static str],
}

/// @ai:intent Runs mypy, pylint and bandit in that order on one Python file
pub struct PythonStaticAdapter {
    checkers: Vec<Checker>,
}

impl PythonStaticAdapter {
    /// @ai:intent Create an adapter from configured binaries
    /// @ai:effects pure
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            checkers: vec![
                Checker {
                    name: "mypy",
                    binary: tools.mypy.clone(),
                    flags: &["--ignore-missing-imports"],
                },
                Checker {
                    name: "pylint",
                    binary: tools.pylint.clone(),
                    flags: &[],
                },
                Checker {
                    name: "bandit",
                    binary: tools.bandit.clone(),
                    flags: &["-r"],
                },
            ],
        }
    }

    /// @ai:intent Run one checker; a spawn failure becomes its output text
    /// @ai:effects io
    async fn run_checker(checker: &Checker, path: &Path) -> ToolOutput {
        let mut command = Command::new(&checker.binary);
        command.args(checker.flags).arg(path);

        let output = match run_tool(checker.name, &mut command).await {
            Ok(output) => output.stdout,
            Err(ToolError::Unavailable { .. }) => {
                warn!(tool = checker.name, "Checker binary not found");
                format!("{} not found.", checker.name)
            }
            Err(e) => format!("{} failed: {}", checker.name, e),
        };

        ToolOutput {
            tool: checker.name.to_string(),
            output,
        }
    }
}

#[async_trait]
impl InterpretedStaticAdapterTrait for PythonStaticAdapter {
    /// @ai:intent Run the three checkers sequentially
    /// @ai:post output order is mypy, pylint, bandit
    /// @ai:effects io
    async fn analyze(&self, path: &Path) -> Result<Vec<ToolOutput>, ToolError> {
        if !path.is_file() {
            return Err(ToolError::execution(
                "python-static",
                format!("file {} does not exist", path.display()),
            ));
        }

        let mut results = Vec::with_capacity(self.checkers.len());

        for checker in &self.checkers {
            results.push(Self::run_checker(checker, path).await);
        }

        tracing::info!("Python static analysis completed");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn missing_tools() -> ToolsConfig {
        ToolsConfig {
            mypy: "nonexistent_mypy_xyz".to_string(),
            pylint: "nonexistent_pylint_xyz".to_string(),
            bandit: "nonexistent_bandit_xyz".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_binaries_fill_slots_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.py");
        std::fs::write(&path, "x = 1\n").unwrap();

        let adapter = PythonStaticAdapter::new(&missing_tools());
        let outputs = adapter.analyze(&path).await.unwrap();

        let tools: Vec<_> = outputs.iter().map(|o| o.tool.as_str()).collect();
        assert_eq!(tools, vec!["mypy", "pylint", "bandit"]);
        assert_eq!(outputs[0].output, "mypy not found.");
        assert_eq!(outputs[2].output, "bandit not found.");
    }

    #[tokio::test]
    async fn test_missing_file_is_execution_error() {
        let adapter = PythonStaticAdapter::new(&missing_tools());
        let result = adapter.analyze(Path::new("/nonexistent/sample.py")).await;

        assert!(matches!(result, Err(ToolError::Execution { .. })));
    }
}
