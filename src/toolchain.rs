//! @ai:module:intent Probe which analysis tool binaries are installed
//! @ai:module:layer infrastructure
//! @ai:module:public_api ToolchainValidator, ToolchainStatus, MissingTool
//! @ai:module:stateless true

use crate::config::ToolsConfig;
use crate::model::ToolKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::process::{Command, Stdio};

/// @ai:intent One binary an analyzer family depends on
#[derive(Debug, Clone)]
struct ToolRequirement {
    name: &'static str,
    binary: String,
    family: ToolKind,
}

/// @ai:intent Result of probing every configured binary
#[derive(Debug, Clone, Serialize)]
pub struct ToolchainStatus {
    /// Tool name to availability
    pub tools: BTreeMap<String, bool>,
    #[serde(skip)]
    pub missing_tools: Vec<MissingTool>,
}

impl ToolchainStatus {
    #[cfg(test)]
    fn is_available(&self, name: &str) -> bool {
        self.tools.get(name).copied().unwrap_or(false)
    }
}

/// @ai:intent Information about a missing tool
#[derive(Debug, Clone)]
pub struct MissingTool {
    pub tool_name: String,
    pub binary: String,
    pub family: ToolKind,
    pub install_hint: &'static str,
}

/// @ai:intent Validates that analysis tools are installed
pub struct ToolchainValidator;

impl ToolchainValidator {
    /// @ai:intent Binaries each analyzer family shells out to
    /// @ai:effects pure
    fn requirements(tools: &ToolsConfig) -> Vec<ToolRequirement> {
        use ToolKind::*;

        let table: [(&'static str, &String, ToolKind); 13] = [
            ("clang-tidy", &tools.clang_tidy, CompiledStatic),
            ("mypy", &tools.mypy, InterpretedStatic),
            ("pylint", &tools.pylint, InterpretedStatic),
            ("bandit", &tools.bandit, InterpretedStatic),
            ("sonar-scanner", &tools.sonar_scanner, CrossLanguageStatic),
            ("valgrind", &tools.valgrind, DynamicMemory),
            ("gcc", &tools.gcc, DynamicMemory),
            ("g++", &tools.gxx, DynamicMemory),
            ("gfortran", &tools.gfortran, DynamicMemory),
            ("gnatmake", &tools.gnatmake, DynamicMemory),
            ("javac", &tools.javac, DynamicMemory),
            ("java", &tools.java, DynamicMemory),
            ("dafny", &tools.dafny, FormalVerification),
        ];

        table
            .into_iter()
            .map(|(name, binary, family)| ToolRequirement {
                name,
                binary: binary.clone(),
                family,
            })
            .collect()
    }

    /// @ai:intent Get install hint for a tool
    /// @ai:effects pure
    fn get_install_hint(tool: &str) -> &'static str {
        match tool {
            "clang-tidy" => "Install clang-tools (e.g. apt install clang-tidy)",
            "mypy" | "pylint" | "bandit" => "Install with pip: pip install mypy pylint bandit",
            "sonar-scanner" => "Install SonarScanner CLI and set sonarqube.url in the config",
            "valgrind" => "Install Valgrind: apt install valgrind",
            "gcc" | "g++" => "Install GCC: apt install build-essential",
            "gfortran" => "Install gfortran: apt install gfortran",
            "gnatmake" => "Install GNAT: apt install gnat",
            "javac" | "java" => "Install a JDK: apt install default-jdk",
            "dafny" => "Install Dafny: https://github.com/dafny-lang/dafny/releases",
            _ => "Check tool documentation for installation instructions",
        }
    }

    /// @ai:intent Check if a binary can be launched at all
    /// @ai:effects io
    fn is_tool_available(binary: &str) -> bool {
        Command::new(binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    /// @ai:intent Probe all configured binaries and return status
    /// @ai:effects io
    pub fn validate(tools: &ToolsConfig) -> ToolchainStatus {
        let mut available = BTreeMap::new();
        let mut missing_tools = Vec::new();

        for requirement in Self::requirements(tools) {
            let found = Self::is_tool_available(&requirement.binary);
            available.insert(requirement.name.to_string(), found);

            if !found {
                missing_tools.push(MissingTool {
                    tool_name: requirement.name.to_string(),
                    binary: requirement.binary,
                    family: requirement.family,
                    install_hint: Self::get_install_hint(requirement.name),
                });
            }
        }

        ToolchainStatus {
            tools: available,
            missing_tools,
        }
    }

    /// @ai:intent Log warnings for missing tools
    /// @ai:effects io
    pub fn log_warnings(status: &ToolchainStatus) {
        for missing in &status.missing_tools {
            tracing::warn!(
                "Tool '{}' ({}) not found - {} results will be reported as tool_missing. {}",
                missing.tool_name,
                missing.binary,
                missing.family,
                missing.install_hint
            );
        }
    }
}
