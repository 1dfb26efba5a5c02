//! @ai:module:intent Formal verification of a verification-language file
//! @ai:module:layer infrastructure
//! @ai:module:public_api DafnyAdapter
//! @ai:module:stateless true

use super::process::run_tool;
use super::FormalVerificationAdapterTrait;
use crate::error::ToolError;
use crate::model::FormalVerificationReport;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

const TOOL: &str = "dafny";

/// @ai:intent Runs `dafny verify` and records whether the verifier finished
pub struct DafnyAdapter {
    binary: String,
    success_marker: String,
}

impl DafnyAdapter {
    /// @ai:intent Create an adapter for the given binary and success marker
    /// @ai:effects pure
    pub fn new(binary: impl Into<String>, success_marker: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            success_marker: success_marker.into(),
        }
    }

    /// @ai:intent Build the report from captured streams
    /// @ai:effects pure
    fn build_report(&self, stdout: &str, stderr: &str) -> FormalVerificationReport {
        let status = if stdout.contains(&self.success_marker) {
            "success"
        } else {
            "failure"
        };

        FormalVerificationReport {
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            verification_status: status.to_string(),
        }
    }
}

#[async_trait]
impl FormalVerificationAdapterTrait for DafnyAdapter {
    /// @ai:effects io
    async fn verify(&self, path: &Path) -> Result<FormalVerificationReport, ToolError> {
        let mut command = Command::new(&self.binary);
        command.arg("verify").arg(path);

        let output = run_tool(TOOL, &mut command).await?;

        let report = self.build_report(&output.stdout, &output.stderr);
        tracing::info!(status = %report.verification_status, "Dafny verification completed");

        Ok(report)
    }
}
