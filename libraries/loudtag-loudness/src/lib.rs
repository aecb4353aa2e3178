//! Loudness measurement, gain calculation and album aggregation for loudtag
//!
//! This crate provides:
//! - EBU R128 loudness measurement (integrated LUFS, loudness range, true peak)
//! - File decoding through symphonia behind the [`Analyzer`] trait
//! - ReplayGain 2.0 / R128 gain calculation with pre-gain
//! - True peak clipping prediction and correction
//! - A result registry that aggregates album loudness from the combined program
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ Audio File  │ ──► │  Analyzer    │ ──► │ ResultRegistry │
//! └─────────────┘     └──────────────┘     └────────────────┘
//!                                                 │
//!                                                 ▼
//!                     ┌──────────────┐     ┌────────────────┐
//!                     │ ClipCorrector│ ◄── │  gain()        │
//!                     └──────────────┘     └────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use loudtag_loudness::{Analyzer, ResultRegistry, SymphoniaAnalyzer};
//!
//! let analyzer = SymphoniaAnalyzer::new();
//! let mut registry = ResultRegistry::new(1, -18.0, ClipCorrector::default());
//! registry.record(0, analyzer.analyze(path)?);
//!
//! let result = registry.get_track_result(0, 0.0).unwrap();
//! println!("Track gain: {:.2} dB", result.track_gain);
//! ```

#![deny(unsafe_code)]

mod analyzer;
mod clipping;
mod decoder;
mod error;
mod gain;
mod registry;

pub use analyzer::{LoudnessAnalyzer, ProgramLoudness, ProgramState};
pub use clipping::{ClipCorrector, Correction};
pub use decoder::{Analysis, Analyzer, SymphoniaAnalyzer};
pub use error::{LoudnessError, Result};
pub use gain::{db_to_linear, gain, linear_to_db, reference_for};
pub use registry::{AlbumAggregate, ResultRegistry};

/// ReplayGain 2.0 reference loudness level (-18 LUFS)
pub const REPLAYGAIN_REFERENCE_LUFS: f64 = -18.0;

/// EBU R128 reference level (-23 LUFS), always used for Opus output gain
pub const OPUS_REFERENCE_LUFS: f64 = -23.0;

/// Default true peak ceiling (-1 dBTP)
pub const DEFAULT_MAX_TRUE_PEAK_DBTP: f64 = -1.0;
