//! @ai:module:intent Cross-language static analysis through a SonarQube server
//! @ai:module:layer infrastructure
//! @ai:module:public_api SonarQubeAdapter, SONAR_METRICS
//! @ai:module:stateless true

use super::process::run_tool;
use super::CrossLanguageStaticAdapterTrait;
use crate::config::SonarQubeConfig;
use crate::error::ToolError;
use crate::model::{CrossLanguageReport, Measure};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

const TOOL: &str = "sonarqube";

/// Metrics requested from the measures endpoint.
pub const SONAR_METRICS: &str = "alert_status,bugs,vulnerabilities,code_smells,coverage,ncloc,complexity,\
duplicated_lines_density,duplicated_blocks,security_rating,reliability_rating,\
comment_lines_density,line_coverage,branch_coverage,complexity_in_classes,\
complexity_in_functions,functions,files,classes,statements,comment_lines,\
public_documented_api_density,public_undocumented_api";

#[derive(Debug, Deserialize)]
struct ComponentsResponse {
    #[serde(default)]
    components: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MeasuresResponse {
    #[serde(default)]
    component: MeasuresComponent,
}

#[derive(Debug, Default, Deserialize)]
struct MeasuresComponent {
    #[serde(default)]
    measures: Vec<RawMeasure>,
}

#[derive(Debug, Deserialize)]
struct RawMeasure {
    metric: String,
    #[serde(default)]
    value: Option<String>,
}

/// @ai:intent Stages one file, runs the scanner, and pulls the project's measures
pub struct SonarQubeAdapter {
    scanner: String,
    config: SonarQubeConfig,
    client: reqwest::Client,
}

impl SonarQubeAdapter {
    /// @ai:intent Create an adapter for a scanner binary and server
    /// @ai:effects pure
    pub fn new(scanner: impl Into<String>, config: SonarQubeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            scanner: scanner.into(),
            config,
            client,
        }
    }

    /// @ai:intent Scanner `-D` properties for the staged project
    /// @ai:effects pure
    fn scanner_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("-Dsonar.projectKey={}", self.config.project_key),
            "-Dsonar.sources=.".to_string(),
            format!("-Dsonar.host.url={}", self.config.url),
        ];

        if !self.config.username.is_empty() {
            args.push(format!("-Dsonar.login={}", self.config.username));
            args.push(format!("-Dsonar.password={}", self.config.password));
        }

        args
    }

    /// @ai:intent Authenticated GET against the web API
    /// @ai:effects network
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ToolError> {
        let url = format!("{}{}", self.config.url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ToolError::unavailable(TOOL, e)
                } else {
                    ToolError::execution(TOOL, e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            return Err(ToolError::execution(
                TOOL,
                format!("{endpoint} returned {status}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ToolError::execution(TOOL, format!("malformed response from {endpoint}: {e}")))
    }

    /// @ai:intent Fetch components and measures for the configured project
    /// @ai:effects network
    async fn fetch_report(&self) -> Result<CrossLanguageReport, ToolError> {
        let key = self.config.project_key.as_str();

        let components: ComponentsResponse = self
            .get(
                "/api/components/search",
                &[("qualifiers", "TRK"), ("componentKeys", key)],
            )
            .await?;

        if components.components.is_empty() {
            return Err(ToolError::execution(
                TOOL,
                format!("no components found for project key '{key}'"),
            ));
        }

        let measures: MeasuresResponse = self
            .get(
                "/api/measures/component",
                &[("component", key), ("metricKeys", SONAR_METRICS)],
            )
            .await?;

        let measures = to_measures(measures.component.measures);

        if measures.is_empty() {
            return Err(ToolError::execution(
                TOOL,
                format!("no measures found for project key '{key}'"),
            ));
        }

        Ok(CrossLanguageReport {
            components: components.components,
            measures,
        })
    }
}

/// @ai:intent Keep only measures that carry a value
/// @ai:effects pure
fn to_measures(raw: Vec<RawMeasure>) -> Vec<Measure> {
    raw.into_iter()
        .filter_map(|m| {
            m.value.map(|value| Measure {
                metric: m.metric,
                value,
            })
        })
        .collect()
}

#[async_trait]
impl CrossLanguageStaticAdapterTrait for SonarQubeAdapter {
    /// @ai:intent Scan only this request's staged copy, then read results back
    /// @ai:effects fs:write, io, network
    async fn analyze(&self, path: &Path) -> Result<CrossLanguageReport, ToolError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ToolError::execution(TOOL, "source path has no file name"))?;

        let staging = tempfile::Builder::new()
            .prefix("codescore_sonar_")
            .tempdir()
            .map_err(|e| ToolError::execution(TOOL, e))?;

        tokio::fs::copy(path, staging.path().join(file_name))
            .await
            .map_err(|e| ToolError::execution(TOOL, e))?;

        let mut command = Command::new(&self.scanner);
        command.args(self.scanner_args()).current_dir(staging.path());

        let output = run_tool("sonar-scanner", &mut command).await?;
        debug!(stdout = %output.stdout, "sonar-scanner output");

        if !output.success() {
            return Err(ToolError::execution(
                TOOL,
                format!("scanner exited with {:?}: {}", output.code, output.stderr.trim()),
            ));
        }

        let report = self.fetch_report().await?;
        info!(measures = report.measures.len(), "SonarQube analysis completed");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SonarQubeConfig {
        SonarQubeConfig {
            url: "http://127.0.0.1:9".to_string(),
            project_key: "demo".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_scanner_args_carry_project_and_credentials() {
        let adapter = SonarQubeAdapter::new("sonar-scanner", config());
        let args = adapter.scanner_args();

        assert!(args.contains(&"-Dsonar.projectKey=demo".to_string()));
        assert!(args.contains(&"-Dsonar.host.url=http://127.0.0.1:9".to_string()));
        assert!(args.contains(&"-Dsonar.login=admin".to_string()));
    }

    #[test]
    fn test_measures_without_value_are_dropped() {
        let parsed: MeasuresResponse = serde_json::from_str(
            r#"{"component": {"measures": [
                {"metric": "bugs", "value": "0"},
                {"metric": "new_bugs", "periods": [{"index": 1, "value": "0"}]}
            ]}}"#,
        )
        .unwrap();

        let measures = to_measures(parsed.component.measures);
        assert_eq!(
            measures,
            vec![Measure {
                metric: "bugs".to_string(),
                value: "0".to_string()
            }]
        );
    }

    #[test]
    fn test_metric_list_covers_scored_metrics() {
        for metric in ["bugs", "vulnerabilities", "complexity", "line_coverage", "duplicated_lines_density"] {
            assert!(SONAR_METRICS.split(',').any(|m| m == metric));
        }
    }

    #[tokio::test]
    async fn test_missing_scanner_is_unavailable() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("temp_code.js");
        std::fs::write(&path, "console.log(1);").unwrap();

        let adapter = SonarQubeAdapter::new("nonexistent_scanner_xyz", config());
        let err = adapter.analyze(&path).await.unwrap_err();

        assert!(matches!(err, ToolError::Unavailable { .. }));
    }
}
