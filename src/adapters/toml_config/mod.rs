// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::model::*;
use crate::error::{QuadError, QuadResult};
use crate::ports::WebDavRemote;
use crate::utils::path::expand_home;

/// File locations used when the command line does not name them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub tags_file: String,
    pub video_dir: String,
    pub output_dir: String,
    pub background: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            tags_file: "~/videos/quadrant-tags.json".to_string(),
            video_dir: "~/videos".to_string(),
            output_dir: "~/videos/processed".to_string(),
            background: "~/gpc-bg.png".to_string(),
        }
    }
}

/// External programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub renderer: String,
    pub renderer_args: Vec<String>,
    pub rclone: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            renderer: "img2sixel".to_string(),
            renderer_args: Vec::new(),
            rclone: "rclone".to_string(),
        }
    }
}

/// Detector defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    pub scene_threshold: f64,
    pub slide_threshold: f64,
    pub slide_quadrant: String,
    pub silence_noise_db: i32,
    pub silence_min_gap: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            scene_threshold: 0.3,
            slide_threshold: 0.1,
            slide_quadrant: "top-left".to_string(),
            silence_noise_db: -35,
            silence_min_gap: 3.0,
        }
    }
}

/// External audio matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub audio_dir: String,
    pub output_dir: String,
    /// Batch runs only take tagged videos whose path contains this text
    pub room_filter: String,
    pub min_score: f64,
    pub analysis_seconds: u32,
    pub sample_rate: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let settings = AudioSyncSettings::default();
        Self {
            audio_dir: "~/downloads/Second Room Recordings/Audio".to_string(),
            output_dir: "~/videos/synced".to_string(),
            room_filter: "Second Room".to_string(),
            min_score: settings.min_score,
            analysis_seconds: settings.analysis_seconds,
            sample_rate: settings.sample_rate,
        }
    }
}

impl SyncConfig {
    pub fn settings(&self) -> QuadResult<AudioSyncSettings> {
        AudioSyncSettings::new(self.sample_rate, self.analysis_seconds, self.min_score)
    }
}

/// WebDAV server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDavConfig {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub vendor: String,
}

impl Default for WebDavConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            password: None,
            vendor: "nextcloud".to_string(),
        }
    }
}

impl WebDavConfig {
    /// Complete remote settings, or an error naming what is missing
    pub fn remote(&self) -> QuadResult<WebDavRemote> {
        let missing = |what: &str| QuadError::Config {
            message: format!(
                "WebDAV {} is not set (use [webdav] in the config file or QUADCUT_WEBDAV_{})",
                what,
                what.to_uppercase()
            ),
        };

        Ok(WebDavRemote {
            url: self.url.clone().ok_or_else(|| missing("url"))?,
            user: self.user.clone().ok_or_else(|| missing("user"))?,
            password: self.password.clone().ok_or_else(|| missing("password"))?,
            vendor: self.vendor.clone(),
        })
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub tools: ToolsConfig,
    pub encode: EncodeSettings,
    pub layout: Layout,
    pub detect: DetectConfig,
    pub sync: SyncConfig,
    pub webdav: WebDavConfig,
}

/// Environment variables and the settings they override
pub const ENV_OVERRIDES: &[&str] = &[
    "QUADCUT_TAGS_FILE",
    "QUADCUT_VIDEO_DIR",
    "QUADCUT_OUTPUT_DIR",
    "QUADCUT_BACKGROUND",
    "QUADCUT_FFMPEG",
    "QUADCUT_FFPROBE",
    "QUADCUT_RENDERER",
    "QUADCUT_RCLONE",
    "QUADCUT_CRF",
    "QUADCUT_PRESET",
    "QUADCUT_AUDIO_DIR",
    "QUADCUT_SYNC_OUTPUT_DIR",
    "QUADCUT_WEBDAV_URL",
    "QUADCUT_WEBDAV_USER",
    "QUADCUT_WEBDAV_PASSWORD",
    "QUADCUT_WEBDAV_VENDOR",
];

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> QuadResult<Self> {
        toml::from_str(content).map_err(|e| QuadError::Config {
            message: format!("failed to parse TOML config: {}", e),
        })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> QuadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| QuadError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        info!("Loading configuration from {}", path.display());
        Self::from_toml(&content)
    }

    /// Candidate config files, most specific first
    pub fn default_locations(env_path: Option<String>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = env_path {
            paths.push(expand_home(&path));
        }
        paths.push(PathBuf::from("quadcut.toml"));
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("quadcut")
                    .join("config.toml"),
            );
        }
        paths
    }

    /// Apply `QUADCUT_*` overrides; returns how many were applied
    pub fn apply_env<F>(&mut self, lookup: F) -> QuadResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        for key in ENV_OVERRIDES {
            let Some(value) = lookup(key) else {
                continue;
            };

            match *key {
                "QUADCUT_TAGS_FILE" => self.paths.tags_file = value,
                "QUADCUT_VIDEO_DIR" => self.paths.video_dir = value,
                "QUADCUT_OUTPUT_DIR" => self.paths.output_dir = value,
                "QUADCUT_BACKGROUND" => self.paths.background = value,
                "QUADCUT_FFMPEG" => self.tools.ffmpeg = value,
                "QUADCUT_FFPROBE" => self.tools.ffprobe = value,
                "QUADCUT_RENDERER" => self.tools.renderer = value,
                "QUADCUT_RCLONE" => self.tools.rclone = value,
                "QUADCUT_CRF" => {
                    self.encode.crf = value.parse().map_err(|_| QuadError::Config {
                        message: format!("QUADCUT_CRF must be a number, got '{}'", value),
                    })?
                }
                "QUADCUT_PRESET" => self.encode.preset = value,
                "QUADCUT_AUDIO_DIR" => self.sync.audio_dir = value,
                "QUADCUT_SYNC_OUTPUT_DIR" => self.sync.output_dir = value,
                "QUADCUT_WEBDAV_URL" => self.webdav.url = Some(value),
                "QUADCUT_WEBDAV_USER" => self.webdav.user = Some(value),
                "QUADCUT_WEBDAV_PASSWORD" => self.webdav.password = Some(value),
                "QUADCUT_WEBDAV_VENDOR" => self.webdav.vendor = value,
                _ => continue,
            }

            // Values may be secrets; log only the name
            info!("Found environment override: {}", key);
            applied += 1;
        }

        Ok(applied)
    }

    /// Reject settings the tools would fail on later
    pub fn validate(&self) -> QuadResult<()> {
        let invalid = |message: String| Err(QuadError::Config { message });

        if self.encode.crf > 51 {
            return invalid(format!("CRF {} exceeds 51", self.encode.crf));
        }
        validate_threshold(self.detect.scene_threshold)?;
        validate_threshold(self.detect.slide_threshold)?;
        SilenceParams::new(self.detect.silence_noise_db, self.detect.silence_min_gap)?;
        self.detect.slide_quadrant.parse::<Quadrant>()?;

        if let SourceSize::Fixed(frame) = self.layout.source {
            Quadrant::TopLeft.crop(frame, self.layout.inset)?;
        }
        if self.layout.pip_height == 0 {
            return invalid("layout.pip_height must be positive".to_string());
        }
        self.sync.settings()?;

        Ok(())
    }

    pub fn tags_file(&self) -> PathBuf {
        expand_home(&self.paths.tags_file)
    }

    pub fn video_dir(&self) -> PathBuf {
        expand_home(&self.paths.video_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        expand_home(&self.paths.output_dir)
    }

    pub fn background(&self) -> PathBuf {
        expand_home(&self.paths.background)
    }

    pub fn audio_dir(&self) -> PathBuf {
        expand_home(&self.sync.audio_dir)
    }

    pub fn synced_dir(&self) -> PathBuf {
        expand_home(&self.sync.output_dir)
    }
}
