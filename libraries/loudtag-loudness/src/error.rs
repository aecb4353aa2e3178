//! Error types for loudness analysis

use thiserror::Error;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur during loudness analysis and album aggregation
#[derive(Error, Debug)]
pub enum LoudnessError {
    /// Invalid sample rate
    #[error("Invalid sample rate: {0} Hz (must be between 8000 and 384000)")]
    InvalidSampleRate(u32),

    /// Invalid channel count
    #[error("Invalid channel count: {0} (must be 1-8)")]
    InvalidChannelCount(u32),

    /// EBU R128 analysis error
    #[error("EBU R128 analysis failed: {0}")]
    AnalysisError(String),

    /// No samples were provided for analysis
    #[error("No audio samples provided for analysis")]
    NoSamples,

    /// Audio is completely silent
    #[error("Audio is silent (no loudness data available)")]
    SilentAudio,

    /// Container or codec could not be decoded
    #[error("Decode failed: {0}")]
    Decode(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Album aggregation requested with no successfully measured track
    #[error("No track of the album could be measured")]
    EmptyAlbum,

    /// Opus and non-Opus tracks in one album (different reference levels)
    #[error("Cannot calculate correct album gain when mixing Opus and non-Opus files")]
    MixedOpusAlbum,

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ebur128::Error> for LoudnessError {
    fn from(err: ebur128::Error) -> Self {
        Self::AnalysisError(format!("{:?}", err))
    }
}

impl From<symphonia::core::errors::Error> for LoudnessError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error as SymphoniaError;
        match err {
            SymphoniaError::IoError(e) => Self::IoError(e),
            SymphoniaError::Unsupported(what) => Self::UnsupportedFormat(what.to_string()),
            other => Self::Decode(other.to_string()),
        }
    }
}

impl From<lofty::error::LoftyError> for LoudnessError {
    fn from(err: lofty::error::LoftyError) -> Self {
        Self::UnsupportedFormat(err.to_string())
    }
}
