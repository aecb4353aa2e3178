//! Errors that abort a whole run
use loudtag_core::CoreError;
use loudtag_loudness::LoudnessError;
use thiserror::Error;

/// Result type for the run engine
pub type Result<T> = std::result::Result<T, RunError>;

/// Fatal run errors; per-file failures are collected in the summary instead
#[derive(Error, Debug)]
pub enum RunError {
    /// Configuration file or environment could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// An option value is invalid
    #[error(transparent)]
    InvalidOption(#[from] CoreError),

    /// Album-level failure (Opus mixed with other codecs)
    #[error(transparent)]
    Album(#[from] LoudnessError),

    /// Writing the report failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for RunError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
