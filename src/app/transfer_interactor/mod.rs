// Transfer interactors - WebDAV downloads through rclone and direct uploads

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{QuadError, QuadResult};
use crate::ports::*;
use crate::utils::path::file_name_of;

/// Interactor for pulling recordings from the WebDAV server
pub struct DownloadInteractor {
    sync_port: Arc<dyn SyncPort>,
}

impl DownloadInteractor {
    pub fn new(sync_port: Arc<dyn SyncPort>) -> Self {
        Self { sync_port }
    }

    /// Copy `remote_path` into `local_dir`, creating the directory first
    pub async fn execute(
        &self,
        remote: &WebDavRemote,
        remote_path: &str,
        local_dir: &Path,
    ) -> QuadResult<()> {
        if remote_path.trim().is_empty() {
            return Err(QuadError::invalid_parameter(
                "remote path",
                "must not be empty",
            ));
        }

        std::fs::create_dir_all(local_dir)?;
        let obscured = self.sync_port.obscure(&remote.password).await?;

        info!(
            "Downloading {} from {} into {}",
            remote_path,
            remote.url,
            local_dir.display()
        );
        self.sync_port
            .copy_from_remote(remote, &obscured, remote_path, local_dir)
            .await
    }
}

/// Result of uploading a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// File name and bytes sent
    pub uploaded: Vec<(String, u64)>,
    /// File name and error message
    pub failed: Vec<(String, String)>,
}

/// Interactor for pushing rendered files to the WebDAV server
pub struct UploadInteractor {
    upload_port: Arc<dyn UploadPort>,
}

impl UploadInteractor {
    pub fn new(upload_port: Arc<dyn UploadPort>) -> Self {
        Self { upload_port }
    }

    /// Upload the regular files directly inside `local_dir` to `remote_dir`
    pub async fn execute(&self, local_dir: &Path, remote_dir: &str) -> QuadResult<UploadSummary> {
        if !local_dir.is_dir() {
            return Err(QuadError::InputFileNotFound {
                path: local_dir.display().to_string(),
            });
        }

        let mut files: Vec<_> = std::fs::read_dir(local_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let mut summary = UploadSummary::default();
        if files.is_empty() {
            warn!("Nothing to upload in {}", local_dir.display());
            return Ok(summary);
        }

        let remote_dir = remote_dir.trim_matches('/');
        if !remote_dir.is_empty() {
            if let Err(e) = self.upload_port.ensure_folder(remote_dir).await {
                warn!("Could not create remote folder {}: {}", remote_dir, e);
            }
        }

        for path in &files {
            let name = file_name_of(path);
            let remote_path = if remote_dir.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", remote_dir, name)
            };

            match self.upload_port.put_file(path, &remote_path).await {
                Ok(bytes) => {
                    info!("Uploaded {} ({} bytes)", remote_path, bytes);
                    summary.uploaded.push((name, bytes));
                }
                Err(e) => {
                    error!("Upload of {} failed: {}", name, e);
                    summary.failed.push((name, e.to_string()));
                }
            }
        }

        Ok(summary)
    }
}
