// Doctor interactor - Reports which external tools can be started

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::toml_config::ToolsConfig;
use crate::ports::*;

pub struct DoctorInteractor {
    checker: Arc<dyn ToolCheckPort>,
}

impl DoctorInteractor {
    pub fn new(checker: Arc<dyn ToolCheckPort>) -> Self {
        Self { checker }
    }

    /// Check every configured tool; never fails, the statuses say what is missing
    pub async fn execute(&self, tools: &ToolsConfig) -> Vec<ToolStatus> {
        let checks: [(&str, &str, &[&str]); 4] = [
            ("encoder", &tools.ffmpeg, &["-version"]),
            ("probe", &tools.ffprobe, &["-version"]),
            ("renderer", &tools.renderer, &["--version"]),
            ("sync client", &tools.rclone, &["version"]),
        ];

        let mut statuses = Vec::with_capacity(checks.len());
        for (name, program, args) in checks {
            let status = self.checker.check(name, program, args).await;
            if status.available {
                info!("{} ({}) available", name, program);
            } else {
                warn!("{} ({}) not found", name, program);
            }
            statuses.push(status);
        }
        statuses
    }
}
