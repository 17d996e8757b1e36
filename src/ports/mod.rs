// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::model::*;
use crate::error::QuadResult;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Container duration in seconds
    async fn duration(&self, input: &Path) -> QuadResult<f64>;

    /// Size of the first video stream
    async fn frame_size(&self, input: &Path) -> QuadResult<FrameSize>;
}

/// Port for the encoder binary
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Write the frame at `at_seconds` to `output` as an image
    async fn extract_frame(&self, input: &Path, at_seconds: f64, output: &Path) -> QuadResult<()>;

    /// Run one composite encode
    async fn composite(&self, job: &CompositeJob) -> QuadResult<()>;

    /// Run silence detection and return the silences found
    async fn detect_silence(
        &self,
        input: &Path,
        params: &SilenceParams,
        duration: Option<f64>,
    ) -> QuadResult<Vec<Silence>>;

    /// Run scene-change detection and return the change times in seconds
    async fn detect_scenes(&self, input: &Path, params: &SceneParams) -> QuadResult<Vec<f64>>;
}

/// Port for decoding and replacing audio tracks
#[async_trait]
pub trait AudioPort: Send + Sync {
    /// The first `seconds` of audio in `input`, mono at `sample_rate`, scaled to [-1, 1)
    async fn decode_audio(&self, input: &Path, seconds: u32, sample_rate: u32) -> QuadResult<Vec<f32>>;

    /// Write `job.output` with the video of `job.video` and the shifted audio of `job.audio`
    async fn replace_audio(&self, job: &AudioSyncJob) -> QuadResult<()>;
}

/// Port for showing an image in the terminal
#[async_trait]
pub trait RenderPort: Send + Sync {
    async fn render(&self, image: &Path) -> QuadResult<()>;
}

/// Port for interactive questions
pub trait PromptPort: Send + Sync {
    /// Ask which quadrant holds `role` in `file_name`
    fn ask_quadrant(&self, file_name: &str, role: Role) -> QuadResult<Choice>;
}

/// Port for the persisted tag map
pub trait TagStorePort: Send + Sync {
    fn exists(&self) -> bool;

    /// Load the whole map; a missing file is an empty map
    fn load(&self) -> QuadResult<TagMap>;

    /// Replace the whole map
    fn save(&self, tags: &TagMap) -> QuadResult<()>;

    fn location(&self) -> PathBuf;
}

/// WebDAV endpoint and credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDavRemote {
    pub url: String,
    pub user: String,
    pub password: String,
    /// rclone vendor hint, e.g. `nextcloud`
    pub vendor: String,
}

/// Port for the sync client used for downloads
#[async_trait]
pub trait SyncPort: Send + Sync {
    /// Turn a plain password into the client's obscured form
    async fn obscure(&self, secret: &str) -> QuadResult<String>;

    /// Copy `remote_path` from the WebDAV server into `local_dir`
    async fn copy_from_remote(
        &self,
        remote: &WebDavRemote,
        obscured_password: &str,
        remote_path: &str,
        local_dir: &Path,
    ) -> QuadResult<()>;
}

/// Port for direct WebDAV uploads
#[async_trait]
pub trait UploadPort: Send + Sync {
    /// Create a remote folder; an existing folder is not an error
    async fn ensure_folder(&self, remote_dir: &str) -> QuadResult<()>;

    /// Upload one file, returning the number of bytes sent
    async fn put_file(&self, local: &Path, remote_path: &str) -> QuadResult<u64>;
}

/// Result of checking one external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub program: String,
    pub available: bool,
    /// First line of the version output, when available
    pub version: Option<String>,
}

/// Port for checking that external tools can be started
#[async_trait]
pub trait ToolCheckPort: Send + Sync {
    async fn check(&self, name: &str, program: &str, version_args: &[&str]) -> ToolStatus;
}
