//! quadcut library
//!
//! Workflow tooling for 4-up lecture recordings: quadrant tagging, talk and
//! slide-change detection, compositing and WebDAV transfer. The heavy lifting
//! is done by ffmpeg, ffprobe, a sixel renderer and rclone; this crate owns the
//! orchestration around them.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{Quadrant, TagMap, TagRecord};
pub use error::{QuadError, QuadResult};
