//! @ai:module:intent Dynamic memory analysis: build or interpret a program under valgrind
//! @ai:module:layer infrastructure
//! @ai:module:public_api ValgrindAdapter, parse_valgrind_output, MEMORY_CATEGORIES
//! @ai:module:stateless true

use super::process::run_tool;
use super::DynamicMemoryAdapterTrait;
use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::model::DynamicMemoryReport;
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{info, warn};

const TOOL: &str = "valgrind";

/// Report categories, in the order findings are classified.
pub const MEMORY_CATEGORIES: [&str; 7] = [
    "uninitialized_value_errors",
    "invalid_read_errors",
    "invalid_write_errors",
    "definitely_lost",
    "indirectly_lost",
    "possibly_lost",
    "still_reachable",
];

/// @ai:intent How a source file becomes something valgrind can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaunchKind {
    Compiled,
    Java,
    Interpreted,
}

/// @ai:intent Runs a single source file under `valgrind --leak-check=full`
pub struct ValgrindAdapter {
    tools: ToolsConfig,
    public_class_regex: Regex,
    class_regex: Regex,
}

impl ValgrindAdapter {
    /// @ai:intent Create an adapter from configured binaries
    /// @ai:effects pure
    pub fn new(tools: ToolsConfig) -> Self {
        Self {
            tools,
            public_class_regex: Regex::new(r"public\s+class\s+(\w+)")
                .expect("public class regex is valid"),
            class_regex: Regex::new(r"\bclass\s+(\w+)").expect("class regex is valid"),
        }
    }

    /// @ai:intent Classify a file extension
    /// @ai:effects pure
    fn launch_kind(extension: &str) -> Option<LaunchKind> {
        match extension {
            "c" | "cpp" | "f90" | "f" | "adb" | "asm" => Some(LaunchKind::Compiled),
            "java" => Some(LaunchKind::Java),
            "py" | "pl" => Some(LaunchKind::Interpreted),
            _ => None,
        }
    }

    /// @ai:intent Compiler invocation producing `output` from `source`
    /// @ai:effects pure
    fn compile_command(&self, extension: &str, source: &Path, output: &Path, scratch: &Path) -> Command {
        let mut command = match extension {
            "cpp" => Command::new(&self.tools.gxx),
            "f90" | "f" => Command::new(&self.tools.gfortran),
            "adb" => {
                let mut cmd = Command::new(&self.tools.gnatmake);
                cmd.arg("-D").arg(scratch);
                cmd
            }
            "asm" => {
                let mut cmd = Command::new(&self.tools.gcc);
                cmd.args(["-x", "assembler"]);
                cmd
            }
            _ => Command::new(&self.tools.gcc),
        };

        command.arg(source).arg("-o").arg(output);
        command
    }

    /// @ai:intent Compile natively then run the binary under valgrind
    /// @ai:effects fs:write, io
    async fn run_compiled(
        &self,
        path: &Path,
        extension: &str,
        scratch: &Path,
    ) -> Result<DynamicMemoryReport, ToolError> {
        let binary = scratch.join(if cfg!(windows) { "a.exe" } else { "a.out" });
        let mut compile = self.compile_command(extension, path, &binary, scratch);
        let compiled = run_tool("compiler", &mut compile).await?;

        if !compiled.success() {
            warn!(stderr = %compiled.stderr.trim(), "Compilation failed before memory check");
            return Ok(DynamicMemoryReport::failure("Compilation failed!"));
        }

        let mut command = Command::new(&self.tools.valgrind);
        command.arg("--leak-check=full").arg(&binary);
        let output = run_tool(TOOL, &mut command).await?;

        if !output.success() {
            return Ok(DynamicMemoryReport::failure("Valgrind failed!"));
        }

        Ok(parse_valgrind_output(&output.stderr))
    }

    /// @ai:intent Name the source after its class, compile with javac, run the JVM under valgrind
    /// @ai:effects fs:write, io
    async fn run_java(&self, path: &Path, scratch: &Path) -> Result<DynamicMemoryReport, ToolError> {
        let code = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ToolError::execution(TOOL, e))?;

        let class_name = self
            .public_class_regex
            .captures(&code)
            .or_else(|| self.class_regex.captures(&code))
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ToolError::execution(TOOL, "no class declaration found"))?;

        let source = scratch.join(format!("{class_name}.java"));
        tokio::fs::write(&source, format!("import java.util.*;\n{code}"))
            .await
            .map_err(|e| ToolError::execution(TOOL, e))?;

        let separator = if cfg!(windows) { ";" } else { ":" };
        let mut compile = Command::new(&self.tools.javac);
        compile.arg("-d").arg(scratch);

        if !self.tools.java_classpath.is_empty() {
            compile.arg("-cp").arg(self.tools.java_classpath.join(separator));
        }

        compile.arg(&source);
        let compiled = run_tool("javac", &mut compile).await?;

        if !compiled.success() {
            warn!(stderr = %compiled.stderr.trim(), "javac failed before memory check");
            return Ok(DynamicMemoryReport::failure("Compilation failed!"));
        }

        let classpath = std::iter::once(scratch.display().to_string())
            .chain(self.tools.java_classpath.iter().cloned())
            .collect::<Vec<_>>()
            .join(separator);

        let mut command = Command::new(&self.tools.valgrind);
        command
            .arg("--leak-check=full")
            .arg(&self.tools.java)
            .arg("-cp")
            .arg(classpath)
            .arg(&class_name);

        let output = run_tool(TOOL, &mut command).await?;
        Ok(parse_valgrind_output(&output.stderr))
    }

    /// @ai:intent Run a script under its interpreter inside valgrind
    /// @ai:effects io
    async fn run_interpreted(&self, path: &Path, extension: &str) -> Result<DynamicMemoryReport, ToolError> {
        let interpreter = if extension == "pl" {
            &self.tools.perl
        } else {
            &self.tools.python
        };

        let mut command = Command::new(&self.tools.valgrind);
        command.arg("--leak-check=full").arg(interpreter).arg(path);

        let output = run_tool(TOOL, &mut command).await?;
        Ok(parse_valgrind_output(&output.stderr))
    }
}

#[async_trait]
impl DynamicMemoryAdapterTrait for ValgrindAdapter {
    /// @ai:intent Dispatch on extension and collect memory findings
    /// @ai:post build artifacts live in a scratch dir removed before returning
    /// @ai:effects fs:write, io
    async fn analyze(&self, path: &Path) -> Result<DynamicMemoryReport, ToolError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let kind = Self::launch_kind(&extension).ok_or_else(|| {
            ToolError::execution(TOOL, format!("unsupported file extension: .{extension}"))
        })?;

        let scratch = tempfile::Builder::new()
            .prefix("codescore_valgrind_")
            .tempdir()
            .map_err(|e| ToolError::execution(TOOL, e))?;

        let report = match kind {
            LaunchKind::Compiled => self.run_compiled(path, &extension, scratch.path()).await,
            LaunchKind::Java => self.run_java(path, scratch.path()).await,
            LaunchKind::Interpreted => self.run_interpreted(path, &extension).await,
        }?;

        close_scratch(scratch);
        info!(status = %report.status, "Valgrind analysis completed");
        Ok(report)
    }
}

fn close_scratch(scratch: TempDir) {
    let location: PathBuf = scratch.path().to_path_buf();

    if let Err(e) = scratch.close() {
        warn!(path = %location.display(), error = %e, "Failed to remove valgrind scratch dir");
    }
}

/// @ai:intent Classify valgrind stderr lines into the seven report categories
/// @ai:post each category holds distinct trimmed lines in first-seen order
/// @ai:effects pure
pub fn parse_valgrind_output(stderr: &str) -> DynamicMemoryReport {
    let mut issues: BTreeMap<String, Vec<String>> = MEMORY_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), Vec::new()))
        .collect();

    let mut record = |category: &str, line: &str| {
        if let Some(lines) = issues.get_mut(category) {
            let line = line.trim().to_string();

            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    };

    let mut in_leak_summary = false;

    for line in stderr.lines() {
        if line.contains("Use of uninitialised value") {
            record("uninitialized_value_errors", line);
        } else if line.contains("Invalid read of size") {
            record("invalid_read_errors", line);
        } else if line.contains("Invalid write of size") {
            record("invalid_write_errors", line);
        }

        if line.contains("LEAK SUMMARY:") {
            in_leak_summary = true;
            continue;
        }

        if in_leak_summary {
            if line.contains("definitely lost:") {
                record("definitely_lost", line);
            } else if line.contains("indirectly lost:") {
                record("indirectly_lost", line);
            } else if line.contains("possibly lost:") {
                record("possibly_lost", line);
            } else if line.contains("still reachable:") {
                record("still_reachable", line);
            } else if line.contains("suppressed:") {
                in_leak_summary = false;
            }
        }
    }

    let error_count = issues
        .iter()
        .map(|(category, lines)| (category.clone(), lines.len()))
        .collect();

    DynamicMemoryReport {
        status: "success".to_string(),
        memory_issues: issues,
        error_count,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LEAKY: &str = "\
==123== Memcheck, a memory error detector
==123== Invalid write of size 4
==123==    at 0x109163: main (temp_code.c:6)
==123== Invalid write of size 4
==123== Use of uninitialised value of size 8
==123==
==123== HEAP SUMMARY:
==123==     in use at exit: 40 bytes in 1 blocks
==123==
==123== LEAK SUMMARY:
==123==    definitely lost: 40 bytes in 1 blocks
==123==    indirectly lost: 0 bytes in 0 blocks
==123==      possibly lost: 0 bytes in 0 blocks
==123==    still reachable: 0 bytes in 0 blocks
==123==         suppressed: 0 bytes in 0 blocks
==123== still reachable: outside summary";

    #[test]
    fn test_parse_categories() {
        let report = parse_valgrind_output(LEAKY);

        assert!(report.succeeded());
        assert_eq!(report.memory_issues.len(), 7);
        assert_eq!(
            report.memory_issues["invalid_write_errors"],
            vec!["==123== Invalid write of size 4"]
        );
        assert_eq!(report.error_count["invalid_write_errors"], 1);
        assert_eq!(report.error_count["uninitialized_value_errors"], 1);
        assert_eq!(
            report.memory_issues["definitely_lost"],
            vec!["==123==    definitely lost: 40 bytes in 1 blocks"]
        );
        // the line after "suppressed:" is outside the summary
        assert_eq!(report.error_count["still_reachable"], 1);
        assert_eq!(report.error_count["invalid_read_errors"], 0);
    }

    #[test]
    fn test_clean_run_has_empty_categories() {
        let report = parse_valgrind_output("==1== All heap blocks were freed -- no leaks are possible");

        assert!(report.memory_issues.values().all(|v| v.is_empty()));
        assert!(report.error_count.values().all(|c| *c == 0));
    }

    #[test]
    fn test_launch_kinds() {
        assert_eq!(ValgrindAdapter::launch_kind("cpp"), Some(LaunchKind::Compiled));
        assert_eq!(ValgrindAdapter::launch_kind("adb"), Some(LaunchKind::Compiled));
        assert_eq!(ValgrindAdapter::launch_kind("java"), Some(LaunchKind::Java));
        assert_eq!(ValgrindAdapter::launch_kind("pl"), Some(LaunchKind::Interpreted));
        assert_eq!(ValgrindAdapter::launch_kind("rb"), None);
    }

    #[tokio::test]
    async fn test_unsupported_extension_fails() {
        let adapter = ValgrindAdapter::new(ToolsConfig::default());
        let err = adapter.analyze(Path::new("temp_code.rb")).await.unwrap_err();

        assert!(err.to_string().contains("unsupported file extension: .rb"));
    }

    #[tokio::test]
    async fn test_missing_valgrind_is_unavailable() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("temp_code.py");
        std::fs::write(&path, "print('hi')\n").unwrap();

        let adapter = ValgrindAdapter::new(ToolsConfig {
            valgrind: "nonexistent_valgrind_xyz".to_string(),
            ..Default::default()
        });

        let err = adapter.analyze(&path).await.unwrap_err();
        assert!(matches!(err, ToolError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_java_without_class_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("temp_code.java");
        std::fs::write(&path, "// nothing here\n").unwrap();

        let adapter = ValgrindAdapter::new(ToolsConfig::default());
        let err = adapter.analyze(&path).await.unwrap_err();

        assert!(err.to_string().contains("no class declaration"));
    }
}
