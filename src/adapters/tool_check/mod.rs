//! Checks whether external tools can be started

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::ports::{ToolCheckPort, ToolStatus};

/// Starts each tool with its version flag
#[derive(Debug, Default)]
pub struct ProcessToolCheck;

impl ProcessToolCheck {
    pub fn new() -> Self {
        Self
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ToolCheckPort for ProcessToolCheck {
    async fn check(&self, name: &str, program: &str, version_args: &[&str]) -> ToolStatus {
        let output = Command::new(program)
            .args(version_args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let (available, version) = match output {
            Ok(out) => (true, first_line(&out.stdout).or_else(|| first_line(&out.stderr))),
            Err(_) => (false, None),
        };

        ToolStatus {
            name: name.to_string(),
            program: program.to_string(),
            available,
            version,
        }
    }
}
