//! loudtag
//!
//! ReplayGain 2.0 loudness scanner and tagger built on EBU R128.
//!
//! This library exposes the run engine and its parts for testing purposes.

pub mod cli;
pub mod error;
pub mod report;
pub mod runner;
pub mod settings;

// Re-export commonly used types for convenience
pub use cli::Cli;
pub use error::{Result, RunError};
pub use report::{OutputFormat, Reporter};
pub use runner::{run, RunSummary};
pub use settings::Settings;
