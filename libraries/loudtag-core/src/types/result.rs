//! Measurement and gain result types

use super::media::{Codec, Container};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw EBU R128 measurement of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Path the measurement was taken from
    pub file_path: PathBuf,
    /// Container family
    pub container: Container,
    /// Codec of the first audio stream
    pub codec: Codec,
    /// Integrated loudness in LUFS
    pub integrated_loudness: f64,
    /// Loudness range in LU
    pub loudness_range: f64,
    /// Maximum true peak across channels (linear, 1.0 = 0 dBTP)
    pub true_peak: f64,
    /// Decoded duration in seconds
    pub duration_secs: f64,
}

/// Clipping prediction for one gain/peak pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClipState {
    /// The peak would exceed the ceiling once the gain is applied
    pub will_clip: bool,
    /// The gain was lowered to prevent that
    pub clipped: bool,
}

/// Album-wide loudness, gain and peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlbumResult {
    /// Album gain in dB
    pub gain: f64,
    /// Album integrated loudness in LUFS
    pub loudness: f64,
    /// Album loudness range in LU
    pub loudness_range: f64,
    /// Album true peak (linear)
    pub peak: f64,
    /// Clipping state of the album gain
    pub clip: ClipState,
}

/// Everything known about one file after scanning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Path of the scanned file
    pub file_path: PathBuf,
    /// Container family
    pub container: Container,
    /// Codec of the first audio stream
    pub codec: Codec,
    /// Integrated loudness in LUFS
    pub track_loudness: f64,
    /// Loudness range in LU
    pub track_loudness_range: f64,
    /// True peak (linear)
    pub track_peak: f64,
    /// Track gain in dB, after any clipping correction
    pub track_gain: f64,
    /// Reference loudness the gain was computed against
    pub reference_loudness: f64,
    /// Clipping state of the track gain
    pub track_clip: ClipState,
    /// Album values, set once the whole album is measured
    pub album: Option<AlbumResult>,
}

impl ScanResult {
    /// Whether this file is Opus
    pub fn is_opus(&self) -> bool {
        self.codec.is_opus()
    }

    /// Track true peak in dBTP
    pub fn track_peak_dbtp(&self) -> f64 {
        peak_to_dbtp(self.track_peak)
    }

    /// Album true peak in dBTP, if album values are present
    pub fn album_peak_dbtp(&self) -> Option<f64> {
        self.album.map(|album| peak_to_dbtp(album.peak))
    }
}

/// Linear peak to dBTP; silence maps to negative infinity
pub fn peak_to_dbtp(peak: f64) -> f64 {
    20.0 * peak.log10()
}
