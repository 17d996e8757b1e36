// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod exec_tool;
pub mod json_tags;
pub mod probe_ffprobe;
pub mod rclone_sync;
pub mod sixel_render;
pub mod terminal_prompt;
pub mod tool_check;
pub mod toml_config;
pub mod tracing_log;
pub mod webdav_upload;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use json_tags::JsonTagStore;
pub use probe_ffprobe::FFprobeAdapter;
pub use rclone_sync::RcloneAdapter;
pub use sixel_render::SixelRenderAdapter;
pub use terminal_prompt::TerminalPromptAdapter;
pub use tool_check::ProcessToolCheck;
pub use toml_config::Config;
pub use tracing_log::{init_logging, LogFormat};
pub use webdav_upload::WebDavUploadAdapter;
