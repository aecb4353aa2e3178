/// Core error types for loudtag
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for loudtag
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A tag mode letter that is not known at all
    #[error("Invalid tag mode: '{0}'")]
    InvalidTagMode(String),

    /// An ID3v2 version other than 3 or 4
    #[error("Invalid ID3v2 version: {0} (must be 3 or 4)")]
    InvalidId3v2Version(String),

    /// A numeric option that is not a finite number
    #[error("Invalid {name} value: {value}")]
    InvalidNumber {
        /// Option name as shown to the user
        name: &'static str,
        /// The rejected value
        value: String,
    },
}

impl CoreError {
    /// Create an invalid number error
    pub fn invalid_number(name: &'static str, value: impl ToString) -> Self {
        Self::InvalidNumber {
            name,
            value: value.to_string(),
        }
    }
}
