//! CLI module for quadcut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// quadcut - 4-up lecture recording workflow
///
/// Tags which quadrant holds the presenter and the slides, finds talk
/// boundaries and slide changes, and composites the two quadrants onto a
/// background.
#[derive(Parser, Debug)]
#[command(name = "quadcut")]
#[command(about = "Tag, analyse and composite 4-up lecture recordings")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: $QUADCUT_CONFIG, ./quadcut.toml, ~/.config/quadcut/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, env = "QUADCUT_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactively tag presenter and slides quadrants
    Tag(args::TagArgs),
    /// Find talk boundaries from silences
    FindTalks(args::FindTalksArgs),
    /// Detect hard cuts
    DetectCuts(args::DetectCutsArgs),
    /// Show one frame in the terminal
    Preview(args::PreviewArgs),
    /// Detect slide changes inside one quadrant
    DetectSlides(args::DetectSlidesArgs),
    /// Composite every tagged video
    Process(args::ProcessArgs),
    /// Composite a single video
    Composite(args::CompositeArgs),
    /// Replace audio with the best-matching external recording
    SyncAudio(args::SyncAudioArgs),
    /// Download recordings from WebDAV
    Download(args::DownloadArgs),
    /// Upload a directory to WebDAV
    Upload(args::UploadArgs),
    /// Check that the external tools can be started
    Doctor,
}
