//! @ai:module:intent Compiled-language static analysis via clang-tidy
//! @ai:module:layer infrastructure
//! @ai:module:public_api ClangTidyAdapter
//! @ai:module:stateless true

use super::process::run_tool;
use super::CompiledStaticAdapterTrait;
use crate::error::ToolError;
use crate::model::CompiledStaticReport;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use tokio::process::Command;

const TOOL: &str = "clang-tidy";
const CHECKS: &str = "--checks=*,-clang-diagnostic*-warning";

/// @ai:intent Runs clang-tidy on one C/C++ file and collects diagnostics
pub struct ClangTidyAdapter {
    binary: String,
    error_regex: Regex,
    warning_regex: Regex,
}

impl ClangTidyAdapter {
    /// @ai:intent Create an adapter for the given clang-tidy binary
    /// @ai:effects pure
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            error_regex: Regex::new(r"error: (.*) \[.*\]").expect("error regex is valid"),
            warning_regex: Regex::new(r"warning: (.*) \[.*\]").expect("warning regex is valid"),
        }
    }

    /// @ai:intent Argument list after the binary name
    /// @ai:effects pure
    fn args(path: &Path) -> Vec<String> {
        vec![
            path.display().to_string(),
            CHECKS.to_string(),
            "--".to_string(),
            "-Werror".to_string(),
        ]
    }

    /// @ai:intent Extract diagnostic messages of one kind from tool output
    /// @ai:effects pure
    fn extract_messages(regex: &Regex, output: &str) -> Vec<String> {
        output
            .lines()
            .filter_map(|line| regex.captures(line))
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// @ai:intent Build the report from captured streams
    /// @ai:effects pure
    fn build_report(
        &self,
        path: &Path,
        stdout: &str,
        stderr: &str,
        code: Option<i32>,
    ) -> CompiledStaticReport {
        // clang-tidy prints check findings on stdout and compiler errors on stderr
        let combined = format!("{stdout}\n{stderr}");

        CompiledStaticReport {
            file: path.display().to_string(),
            status: if code == Some(0) { "success" } else { "failure" }.to_string(),
            command: std::iter::once(self.binary.clone())
                .chain(Self::args(path))
                .collect::<Vec<_>>()
                .join(" "),
            errors: Self::extract_messages(&self.error_regex, &combined),
            warnings: Self::extract_messages(&self.warning_regex, &combined),
            return_code: code,
        }
    }
}

#[async_trait]
impl CompiledStaticAdapterTrait for ClangTidyAdapter {
    /// @ai:intent Run clang-tidy with warnings promoted to errors
    /// @ai:effects io
    async fn analyze(&self, path: &Path) -> Result<CompiledStaticReport, ToolError> {
        if !path.is_file() {
            return Err(ToolError::execution(
                TOOL,
                format!("file {} does not exist", path.display()),
            ));
        }

        let mut command = Command::new(&self.binary);
        command.args(Self::args(path));

        let output = run_tool(TOOL, &mut command).await?;

        Ok(self.build_report(path, &output.stdout, &output.stderr, output.code))
    }
}
