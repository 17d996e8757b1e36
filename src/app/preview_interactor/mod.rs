// Preview interactor - Shows one frame of a video in the terminal

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::app::ensure_input;
use crate::error::{QuadError, QuadResult};
use crate::ports::*;

/// What was shown
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResult {
    pub at_seconds: f64,
    /// Kept image, when an output path was requested
    pub image: Option<PathBuf>,
}

/// Interactor for the preview use case
pub struct PreviewInteractor {
    probe_port: Arc<dyn ProbePort>,
    encode_port: Arc<dyn EncodePort>,
    render_port: Arc<dyn RenderPort>,
}

impl PreviewInteractor {
    /// Create new preview interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        encode_port: Arc<dyn EncodePort>,
        render_port: Arc<dyn RenderPort>,
    ) -> Self {
        Self {
            probe_port,
            encode_port,
            render_port,
        }
    }

    /// Extract the frame at `position` (default: the middle) and render it.
    ///
    /// Without `output` the image lives in a temporary file that is removed
    /// once rendered.
    pub async fn execute(
        &self,
        input: &Path,
        position: Option<f64>,
        output: Option<&Path>,
    ) -> QuadResult<PreviewResult> {
        ensure_input(input)?;

        let at_seconds = match position {
            Some(at) if at < 0.0 => {
                return Err(QuadError::invalid_parameter(
                    "position",
                    format!("{} is before the start of the video", at),
                ))
            }
            Some(at) => at,
            None => self.probe_port.duration(input).await? / 2.0,
        };

        info!("Previewing {} at {:.3}s", input.display(), at_seconds);

        match output {
            Some(path) => {
                self.encode_port.extract_frame(input, at_seconds, path).await?;
                self.render_port.render(path).await?;
                Ok(PreviewResult {
                    at_seconds,
                    image: Some(path.to_path_buf()),
                })
            }
            None => {
                let dir = tempfile::TempDir::new()?;
                let image = dir.path().join("preview.jpg");
                self.encode_port.extract_frame(input, at_seconds, &image).await?;
                self.render_port.render(&image).await?;
                Ok(PreviewResult {
                    at_seconds,
                    image: None,
                })
            }
        }
    }
}
