//! Terminal image rendering through a sixel converter

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::adapters::exec_tool::run_attached;
use crate::error::QuadResult;
use crate::ports::RenderPort;

/// Renders images by running e.g. `img2sixel <image>` on the current terminal
pub struct SixelRenderAdapter {
    program: String,
    args: Vec<String>,
}

impl SixelRenderAdapter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl RenderPort for SixelRenderAdapter {
    async fn render(&self, image: &Path) -> QuadResult<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(image);
        run_attached(&self.program, &mut cmd).await
    }
}
