//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Noise floor in dB, accepted in -90..=0
fn noise_db_in_range(s: &str) -> Result<i32, String> {
    clap_num::number_range(s, -90, 0)
}

/// Constant Rate Factor (0-51)
fn crf_in_range(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}

/// Arguments for the tag command
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Directory searched recursively for videos (default: paths.video_dir)
    pub video_dir: Option<PathBuf>,

    /// Tag file to update (default: paths.tags_file)
    pub tags_file: Option<PathBuf>,
}

/// Arguments for the find-talks command
#[derive(Args, Debug)]
pub struct FindTalksArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Minimum silence length in seconds that separates two talks
    pub min_gap: Option<f64>,

    /// Noise floor in dB, e.g. -35
    #[arg(allow_negative_numbers = true, value_parser = noise_db_in_range)]
    pub noise_db: Option<i32>,
}

/// Arguments for the detect-cuts command
#[derive(Args, Debug)]
pub struct DetectCutsArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Scene change threshold in (0, 1]
    pub threshold: Option<f64>,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Position (seconds, MM:SS or HH:MM:SS; default: the middle)
    pub position: Option<String>,

    /// Keep the extracted frame at this path
    pub output: Option<PathBuf>,
}

/// Arguments for the detect-slides command
#[derive(Args, Debug)]
pub struct DetectSlidesArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Scene change threshold in (0, 1]
    pub threshold: Option<f64>,

    /// Quadrant holding the slides (top-left, top-right, bottom-left, bottom-right)
    pub quadrant: Option<String>,
}

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Background image (default: paths.background)
    pub background: Option<PathBuf>,

    /// Output directory (default: paths.output_dir)
    pub output_dir: Option<PathBuf>,

    /// Tag file to read (default: paths.tags_file)
    #[arg(long)]
    pub tags: Option<PathBuf>,

    /// Constant Rate Factor (0-51)
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Encoding preset
    #[arg(long)]
    pub preset: Option<String>,
}

/// Arguments for the composite command
#[derive(Args, Debug)]
pub struct CompositeArgs {
    /// Input 4-up recording
    pub input: PathBuf,

    /// Output video file path
    pub output: PathBuf,

    /// Quadrant holding the presenter
    #[arg(long)]
    pub presenter: String,

    /// Quadrant holding the slides
    #[arg(long)]
    pub slides: String,

    /// Background image (default: paths.background)
    #[arg(long)]
    pub background: Option<PathBuf>,

    /// Constant Rate Factor (0-51)
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Encoding preset
    #[arg(long)]
    pub preset: Option<String>,
}

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Path on the WebDAV server
    pub remote_path: String,

    /// Local directory to copy into
    #[arg(default_value = ".")]
    pub local_dir: PathBuf,
}

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local directory whose files are uploaded
    pub local_dir: PathBuf,

    /// Folder on the WebDAV server
    pub remote_dir: String,
}

/// Arguments for the sync-audio command
#[derive(Args, Debug)]
pub struct SyncAudioArgs {
    /// Video whose audio is replaced; omit it to sync every matching tagged video
    pub video: Option<PathBuf>,

    /// Directory searched for external recordings (default: sync.audio_dir)
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// Output file for a single video (default: <stem>_synced.mp4 beside it)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory holding the composited videos of a batch (default: paths.output_dir)
    #[arg(long)]
    pub video_dir: Option<PathBuf>,

    /// Output directory of a batch (default: sync.output_dir)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Only tagged videos whose path contains this text (default: sync.room_filter)
    #[arg(long)]
    pub filter: Option<String>,

    /// Tag file to read (default: paths.tags_file)
    #[arg(long)]
    pub tags: Option<PathBuf>,

    /// Minimum correlation score for a match to be applied
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Report matches without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
