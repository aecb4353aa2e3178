//! Error types for tag routing and writing

use loudtag_core::{Codec, Container};
use thiserror::Error;

/// Result type for tag operations
pub type Result<T> = std::result::Result<T, TagError>;

/// Errors that can occur while planning or applying a tag update
#[derive(Error, Debug)]
pub enum TagError {
    /// No tag strategy exists for this container/codec combination
    #[error("File type not supported ({container}/{codec})")]
    UnsupportedFormat {
        /// Container family
        container: Container,
        /// Codec
        codec: Codec,
    },

    /// A tag mode that is accepted on the command line but not implemented
    #[error("{0}")]
    UnsupportedMode(&'static str),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A tag item was rejected by the tag format
    #[error("Invalid tag item '{0}'")]
    InvalidItem(String),

    /// A sibling tag could not be removed after the new values were saved
    #[error("Couldn't strip {tag} tag: {reason}")]
    Strip {
        /// Tag type that was being removed
        tag: String,
        /// Underlying failure
        reason: String,
    },

    /// Reading or saving the tag failed
    #[error("Couldn't write to file: {0}")]
    Lofty(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagError {
    /// Create an unsupported format error
    pub fn unsupported(container: Container, codec: Codec) -> Self {
        Self::UnsupportedFormat { container, codec }
    }
}

impl From<lofty::error::LoftyError> for TagError {
    fn from(err: lofty::error::LoftyError) -> Self {
        Self::Lofty(err.to_string())
    }
}
