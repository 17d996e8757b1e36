// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuadError, QuadResult};

#[cfg(test)]
mod tests;

/// One of the four regions of a 4-up recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants in prompt-menu order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }

    /// Pick a quadrant by its 1-based menu number
    pub fn from_menu(choice: usize) -> Option<Self> {
        choice
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }

    fn column(&self) -> u32 {
        match self {
            Quadrant::TopLeft | Quadrant::BottomLeft => 0,
            Quadrant::TopRight | Quadrant::BottomRight => 1,
        }
    }

    fn row(&self) -> u32 {
        match self {
            Quadrant::TopLeft | Quadrant::TopRight => 0,
            Quadrant::BottomLeft | Quadrant::BottomRight => 1,
        }
    }

    /// Crop rectangle for this quadrant of `frame`, trimmed by `inset` pixels on every edge
    pub fn crop(&self, frame: FrameSize, inset: u32) -> QuadResult<CropRect> {
        let half_w = frame.width / 2;
        let half_h = frame.height / 2;

        if inset >= half_w.div_ceil(2) || inset >= half_h.div_ceil(2) {
            return Err(QuadError::invalid_parameter(
                "inset",
                format!("{}px leaves no picture in a {} source", inset, frame),
            ));
        }

        Ok(CropRect {
            width: half_w - 2 * inset,
            height: half_h - 2 * inset,
            x: self.column() * half_w + inset,
            y: self.row() * half_h + inset,
        })
    }
}

impl FromStr for Quadrant {
    type Err = QuadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| QuadError::InvalidQuadrant {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// 3840x2160, the recording size of the 4-up capture
    pub const UHD: FrameSize = FrameSize::new(3840, 2160);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for FrameSize {
    type Err = QuadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuadError::InvalidFrameSize {
            value: s.to_string(),
        };

        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

impl TryFrom<String> for FrameSize {
    type Error = QuadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameSize> for String {
    fn from(size: FrameSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Source frame size used for crop arithmetic: fixed, or probed per file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceSize {
    Fixed(FrameSize),
    Auto,
}

impl FromStr for SourceSize {
    type Err = QuadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(SourceSize::Auto)
        } else {
            s.parse().map(SourceSize::Fixed)
        }
    }
}

impl TryFrom<String> for SourceSize {
    type Error = QuadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceSize> for String {
    fn from(size: SourceSize) -> Self {
        match size {
            SourceSize::Fixed(frame) => frame.to_string(),
            SourceSize::Auto => "auto".to_string(),
        }
    }
}

/// An ffmpeg crop box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

/// Geometry of the composited output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub source: SourceSize,
    /// Pixels trimmed from each quadrant edge
    pub inset: u32,
    pub canvas: FrameSize,
    /// Size of the slides picture, centred on the canvas
    pub main: FrameSize,
    /// Height of the presenter picture-in-picture
    pub pip_height: u32,
    /// Distance of the picture-in-picture from the right and bottom edges
    pub margin: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            source: SourceSize::Fixed(FrameSize::UHD),
            inset: 4,
            canvas: FrameSize::new(2560, 1440),
            main: FrameSize::new(1920, 1080),
            pip_height: 320,
            margin: 40,
        }
    }
}

/// Encoder settings for the composite pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    pub codec: String,
    pub crf: u8,
    pub preset: String,
    /// 0 lets the encoder choose
    pub threads: u32,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            crf: 18,
            preset: "veryfast".to_string(),
            threads: 0,
        }
    }
}

/// Which quadrant a prompt is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Presenter,
    Slides,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Presenter => f.write_str("presenter"),
            Role::Slides => f.write_str("slides"),
        }
    }
}

/// Answer to a quadrant prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Picked(Quadrant),
    Skip,
    Quit,
    Invalid(String),
}

/// Persisted tag for one video
///
/// Fields stay plain strings: a hand-edited file is carried through untouched
/// and only rejected when the entry is composited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub presenter: String,
    pub slides: String,
    pub path: String,
}

impl TagRecord {
    pub fn new(presenter: Quadrant, slides: Quadrant, path: impl Into<String>) -> Self {
        Self {
            presenter: presenter.as_str().to_string(),
            slides: slides.as_str().to_string(),
            path: path.into(),
        }
    }

    pub fn presenter_quadrant(&self) -> QuadResult<Quadrant> {
        self.presenter.parse()
    }

    pub fn slides_quadrant(&self) -> QuadResult<Quadrant> {
        self.slides.parse()
    }
}

/// Tag records keyed by video file name
pub type TagMap = BTreeMap<String, TagRecord>;

/// A detected stretch of silence, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Silence {
    pub start: f64,
    pub end: f64,
}

impl Silence {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A stretch of media between two boundaries, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Parameters for ffmpeg's silencedetect filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceParams {
    /// Noise floor in dB (negative)
    pub noise_db: i32,
    /// Minimum silence length in seconds
    pub min_gap: f64,
}

impl SilenceParams {
    pub fn new(noise_db: i32, min_gap: f64) -> QuadResult<Self> {
        if !(-90..=0).contains(&noise_db) {
            return Err(QuadError::invalid_parameter(
                "noise level",
                format!("{} dB is outside -90..=0", noise_db),
            ));
        }
        if !(min_gap > 0.0) {
            return Err(QuadError::invalid_parameter(
                "gap",
                format!("{} must be greater than zero", min_gap),
            ));
        }
        Ok(Self { noise_db, min_gap })
    }
}

/// Parameters for scene-change detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub threshold: f64,
    /// Restrict detection to this region
    pub crop: Option<CropRect>,
}

impl SceneParams {
    pub fn new(threshold: f64, crop: Option<CropRect>) -> QuadResult<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold, crop })
    }
}

/// Scene thresholds live in (0, 1]
pub fn validate_threshold(threshold: f64) -> QuadResult<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(QuadError::invalid_parameter(
            "threshold",
            format!("{} must be in (0, 1]", threshold),
        ))
    }
}

/// Everything the encoder needs to produce one composited file
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeJob {
    pub input: PathBuf,
    pub background: PathBuf,
    pub output: PathBuf,
    pub filter_graph: String,
    pub settings: EncodeSettings,
}

/// Analysis parameters for matching external audio to a video
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSyncSettings {
    /// Mono sample rate the audio is decoded at
    pub sample_rate: u32,
    /// Seconds of video audio compared; external files contribute twice as much
    pub analysis_seconds: u32,
    /// Matches scoring below this are reported and not applied
    pub min_score: f64,
}

impl AudioSyncSettings {
    pub fn new(sample_rate: u32, analysis_seconds: u32, min_score: f64) -> QuadResult<Self> {
        if !(1000..=48000).contains(&sample_rate) {
            return Err(QuadError::invalid_parameter(
                "sample rate",
                format!("{} Hz is outside 1000..=48000", sample_rate),
            ));
        }
        if !(1..=3600).contains(&analysis_seconds) {
            return Err(QuadError::invalid_parameter(
                "analysis length",
                format!("{}s is outside 1..=3600", analysis_seconds),
            ));
        }
        if !(min_score.is_finite() && min_score >= 0.0) {
            return Err(QuadError::invalid_parameter(
                "score",
                format!("{} must be zero or positive", min_score),
            ));
        }
        Ok(Self {
            sample_rate,
            analysis_seconds,
            min_score,
        })
    }
}

impl Default for AudioSyncSettings {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            analysis_seconds: 120,
            min_score: 0.05,
        }
    }
}

/// Best alignment found by cross-correlation.
///
/// A positive `lag` means the candidate recording started later than the
/// reference and has to be delayed; a negative one means its start is trimmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub lag: i64,
    pub score: f64,
}

/// External recording chosen for a video
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMatch {
    pub audio: PathBuf,
    pub offset_seconds: f64,
    pub score: f64,
}

/// Replace the audio of `video` with `audio` shifted by `offset_seconds`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSyncJob {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub offset_seconds: f64,
    pub output: PathBuf,
}
