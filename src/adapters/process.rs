//! @ai:module:intent Run an external tool as a child process and normalize spawn failures
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProcessOutput, run_tool
//! @ai:module:stateless true

use crate::error::ToolError;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// @ai:intent Captured result of a finished child process
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl ProcessOutput {
    /// @ai:intent Whether the process exited with status 0
    /// @ai:effects pure
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// @ai:intent Spawn the command, wait for it, and capture both streams
/// @ai:pre command was built with the tool binary as its program
/// @ai:post a missing binary maps to ToolError::Unavailable
/// @ai:effects io
pub async fn run_tool(tool: &str, command: &mut Command) -> Result<ProcessOutput, ToolError> {
    // Dropping the future (deadline exceeded) must terminate the child.
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(tool, command = ?command.as_std(), "Spawning tool");

    let output = command.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::unavailable(tool, e)
        } else {
            ToolError::execution(tool, e)
        }
    })?;

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: output.status.code(),
    })
}
