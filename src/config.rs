//! @ai:module:intent Configuration structs for the analysis service
//! @ai:module:layer infrastructure
//! @ai:module:public_api ServiceConfig, ServerConfig, PathConfig, AnalysisConfig, ToolsConfig, SonarQubeConfig, FeedbackConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// @ai:intent Main configuration for the analysis service
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub sonarqube: SonarQubeConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// @ai:intent HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// @ai:intent Filesystem locations for temp artifacts and the combined result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    #[serde(default = "default_results_file")]
    pub results_file: PathBuf,
}

/// @ai:intent Request-level analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Substring the verifier prints when it finished checking a program
    #[serde(default = "default_success_marker")]
    pub verifier_success_marker: String,
}

/// @ai:intent Binary names or paths of the external tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_clang_tidy")]
    pub clang_tidy: String,
    #[serde(default = "default_mypy")]
    pub mypy: String,
    #[serde(default = "default_pylint")]
    pub pylint: String,
    #[serde(default = "default_bandit")]
    pub bandit: String,
    #[serde(default = "default_valgrind")]
    pub valgrind: String,
    #[serde(default = "default_dafny")]
    pub dafny: String,
    #[serde(default = "default_sonar_scanner")]
    pub sonar_scanner: String,
    #[serde(default = "default_gcc")]
    pub gcc: String,
    #[serde(default = "default_gxx")]
    pub gxx: String,
    #[serde(default = "default_gfortran")]
    pub gfortran: String,
    #[serde(default = "default_gnatmake")]
    pub gnatmake: String,
    #[serde(default = "default_javac")]
    pub javac: String,
    #[serde(default = "default_java")]
    pub java: String,
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default = "default_perl")]
    pub perl: String,
    /// Extra jars/directories for compiling and running Java samples
    #[serde(default)]
    pub java_classpath: Vec<String>,
}

/// @ai:intent SonarQube server connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonarQubeConfig {
    #[serde(default = "default_sonar_url")]
    pub url: String,
    #[serde(default = "default_project_key")]
    pub project_key: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// @ai:intent Upstream model provider receiving user feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_feedback_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            results_file: default_results_file(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            verifier_success_marker: default_success_marker(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            clang_tidy: default_clang_tidy(),
            mypy: default_mypy(),
            pylint: default_pylint(),
            bandit: default_bandit(),
            valgrind: default_valgrind(),
            dafny: default_dafny(),
            sonar_scanner: default_sonar_scanner(),
            gcc: default_gcc(),
            gxx: default_gxx(),
            gfortran: default_gfortran(),
            gnatmake: default_gnatmake(),
            javac: default_javac(),
            java: default_java(),
            python: default_python(),
            perl: default_perl(),
            java_classpath: Vec::new(),
        }
    }
}

impl Default for SonarQubeConfig {
    fn default() -> Self {
        Self {
            url: default_sonar_url(),
            project_key: default_project_key(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            base_url: default_feedback_base_url(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("temp/code_files")
}

fn default_results_file() -> PathBuf {
    PathBuf::from("Results/combined_results.json")
}

fn default_request_timeout() -> u64 {
    120
}

fn default_success_marker() -> String {
    "Dafny program verifier finished with".to_string()
}

fn default_clang_tidy() -> String {
    "clang-tidy".to_string()
}

fn default_mypy() -> String {
    "mypy".to_string()
}

fn default_pylint() -> String {
    "pylint".to_string()
}

fn default_bandit() -> String {
    "bandit".to_string()
}

fn default_valgrind() -> String {
    "valgrind".to_string()
}

fn default_dafny() -> String {
    "dafny".to_string()
}

fn default_sonar_scanner() -> String {
    "sonar-scanner".to_string()
}

fn default_gcc() -> String {
    "gcc".to_string()
}

fn default_gxx() -> String {
    "g++".to_string()
}

fn default_gfortran() -> String {
    "gfortran".to_string()
}

fn default_gnatmake() -> String {
    "gnatmake".to_string()
}

fn default_javac() -> String {
    "javac".to_string()
}

fn default_java() -> String {
    "java".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_perl() -> String {
    "perl".to_string()
}

fn default_sonar_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_project_key() -> String {
    "codescore".to_string()
}

fn default_feedback_base_url() -> String {
    "https://api.llmprovider.com".to_string()
}

impl ServiceConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Load the file when present, otherwise fall back to defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Per-request deadline as a Duration
    /// @ai:effects pure
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis.request_timeout_secs)
    }
}
