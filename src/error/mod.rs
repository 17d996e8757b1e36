//! Error handling module for quadcut

use thiserror::Error;

/// Main error type for quadcut operations
#[derive(Error, Debug)]
pub enum QuadError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Quadrant label outside the four known regions
    #[error("Invalid quadrant: {value}. Expected top-left, top-right, bottom-left or bottom-right")]
    InvalidQuadrant { value: String },

    /// Frame size not in WIDTHxHEIGHT form
    #[error("Invalid frame size: {value}. Expected WIDTHxHEIGHT, e.g. 3840x2160")]
    InvalidFrameSize { value: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Numeric argument outside its accepted range
    #[error("Invalid {name}: {message}")]
    InvalidParameter { name: String, message: String },

    /// External binary could not be started
    #[error("Could not run `{tool}` (is it installed and on PATH?): {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// External binary exited unsuccessfully
    #[error("`{tool}` exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// External binary produced output we could not interpret
    #[error("Failed to parse {tool} output: {message}")]
    ToolOutput { tool: String, message: String },

    /// Tag file could not be read or written
    #[error("Tag file error ({path}): {message}")]
    TagStore { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// WebDAV transfer error
    #[error("Transfer failed: {message}")]
    Transfer { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl QuadError {
    pub fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        QuadError::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for quadcut operations
pub type QuadResult<T> = std::result::Result<T, QuadError>;
