//! rclone adapter for WebDAV downloads

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

use crate::adapters::exec_tool::{check_status, run_attached, spawn_error};
use crate::error::{QuadError, QuadResult};
use crate::ports::{SyncPort, WebDavRemote};

/// Runs `rclone` against an on-the-fly `:webdav:` remote
pub struct RcloneAdapter {
    program: String,
}

impl RcloneAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for `rclone copy` from the remote into `local_dir`
    pub fn copy_args(
        remote: &WebDavRemote,
        obscured_password: &str,
        remote_path: &str,
        local_dir: &Path,
    ) -> Vec<String> {
        vec![
            "copy".to_string(),
            "--progress".to_string(),
            format!(":webdav:{}", remote_path.trim_start_matches('/')),
            local_dir.to_string_lossy().to_string(),
            "--webdav-url".to_string(),
            remote.url.clone(),
            "--webdav-vendor".to_string(),
            remote.vendor.clone(),
            "--webdav-user".to_string(),
            remote.user.clone(),
            "--webdav-pass".to_string(),
            obscured_password.to_string(),
        ]
    }
}

impl Default for RcloneAdapter {
    fn default() -> Self {
        Self::new("rclone")
    }
}

#[async_trait]
impl SyncPort for RcloneAdapter {
    async fn obscure(&self, secret: &str) -> QuadResult<String> {
        // `obscure -` reads the secret from stdin so it never shows up in argv
        let mut child = Command::new(&self.program)
            .args(["obscure", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(&self.program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(secret.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
        }

        let output = child.wait_with_output().await?;
        check_status(
            &self.program,
            output.status,
            &String::from_utf8_lossy(&output.stderr),
        )?;

        let obscured = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if obscured.is_empty() {
            return Err(QuadError::ToolOutput {
                tool: self.program.clone(),
                message: "obscure printed nothing".to_string(),
            });
        }

        Ok(obscured)
    }

    async fn copy_from_remote(
        &self,
        remote: &WebDavRemote,
        obscured_password: &str,
        remote_path: &str,
        local_dir: &Path,
    ) -> QuadResult<()> {
        info!(
            "Copying {} from {} to {}",
            remote_path,
            remote.url,
            local_dir.display()
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(Self::copy_args(remote, obscured_password, remote_path, local_dir));
        run_attached(&self.program, &mut cmd).await
    }
}
