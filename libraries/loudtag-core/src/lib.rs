//! loudtag Core
//!
//! Platform-agnostic core types and error handling for loudtag.
//!
//! This crate provides the building blocks shared by the loudness engine, the
//! tag router and the command-line tool.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Media Types**: `Container`, `Codec`
//! - **Measurement Types**: `Measurement`, `ScanResult`, `AlbumResult`, `ClipState`
//! - **Run Options**: `RunConfig`, `TagMode`, `Casing`, `ClipPolicy`, `Id3v2Version`
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use loudtag_core::{Codec, Container, RunConfig, TagMode};
//!
//! let config = RunConfig {
//!     album: true,
//!     tag_mode: "e".parse::<TagMode>().unwrap(),
//!     ..RunConfig::default()
//! };
//! assert_eq!(config.unit().as_str(), "dB");
//! assert!(Container::Ogg.is_ogg() && Codec::Opus.is_opus());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{CoreError, Result};

pub use types::{
    // Media types
    Codec, Container,
    // Measurement types
    AlbumResult, ClipState, Measurement, ScanResult,
    // Run options
    Casing, ClipPolicy, GainUnit, Id3v2Version, RunConfig, TagMode,
};
