//! Shared helpers for running external binaries

use std::io::ErrorKind;
use std::process::{ExitStatus, Output};

use tokio::process::Command;
use tracing::debug;

use crate::domain::rules::stderr_tail;
use crate::error::{QuadError, QuadResult};

/// How much stderr to keep in error messages
pub const STDERR_TAIL_CHARS: usize = 500;

/// Map a spawn failure to a domain error
pub fn spawn_error(tool: &str, source: std::io::Error) -> QuadError {
    if source.kind() == ErrorKind::NotFound || source.kind() == ErrorKind::PermissionDenied {
        QuadError::ToolMissing {
            tool: tool.to_string(),
            source,
        }
    } else {
        QuadError::IoError(source)
    }
}

/// Turn a non-zero exit into `ToolFailed`
pub fn check_status(tool: &str, status: ExitStatus, stderr: &str) -> QuadResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(QuadError::ToolFailed {
            tool: tool.to_string(),
            status: status.to_string(),
            stderr: stderr_tail(stderr, STDERR_TAIL_CHARS),
        })
    }
}

/// Run a command to completion with stdout and stderr captured
pub async fn run_captured(tool: &str, command: &mut Command) -> QuadResult<Output> {
    debug!("Running {}: {:?}", tool, command.as_std());

    let output = command
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| spawn_error(tool, e))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    check_status(tool, output.status, &stderr)?;
    Ok(output)
}

/// Run a command with the terminal attached (progress bars, images)
pub async fn run_attached(tool: &str, command: &mut Command) -> QuadResult<()> {
    debug!("Running {} attached: {:?}", tool, command.as_std());

    let status = command
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| spawn_error(tool, e))?;

    check_status(tool, status, "")
}
