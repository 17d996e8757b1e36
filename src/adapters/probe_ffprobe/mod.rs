//! FFprobe adapter for media file probing

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::adapters::exec_tool::run_captured;
use crate::domain::model::FrameSize;
use crate::error::{QuadError, QuadResult};
use crate::ports::ProbePort;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter for the given binary
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn query(&self, input: &Path, args: &[&str]) -> QuadResult<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-v", "error"])
            .args(args)
            .arg(input)
            .stdin(Stdio::null());

        let output = run_captured(&self.program, &mut cmd).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn output_error(&self, message: String) -> QuadError {
        QuadError::ToolOutput {
            tool: self.program.clone(),
            message,
        }
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

/// Parse the `WxH` line printed by `-of csv=s=x:p=0`
pub fn parse_dimensions(text: &str) -> Option<FrameSize> {
    let line = text.lines().next()?.trim().trim_end_matches('x');
    line.parse().ok()
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn duration(&self, input: &Path) -> QuadResult<f64> {
        let text = self
            .query(
                input,
                &[
                    "-show_entries",
                    "format=duration",
                    "-of",
                    "default=noprint_wrappers=1:nokey=1",
                ],
            )
            .await?;

        text.parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| self.output_error(format!("unexpected duration '{}'", text)))
    }

    async fn frame_size(&self, input: &Path) -> QuadResult<FrameSize> {
        let text = self
            .query(
                input,
                &[
                    "-select_streams",
                    "v:0",
                    "-show_entries",
                    "stream=width,height",
                    "-of",
                    "csv=s=x:p=0",
                ],
            )
            .await?;

        parse_dimensions(&text)
            .ok_or_else(|| self.output_error(format!("unexpected dimensions '{}'", text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("3840x2160\n"), Some(FrameSize::UHD));
        // Some containers add a trailing separator
        assert_eq!(parse_dimensions("1920x1080x"), Some(FrameSize::new(1920, 1080)));
        assert_eq!(parse_dimensions(""), None);
        assert_eq!(parse_dimensions("N/A"), None);
    }
}
