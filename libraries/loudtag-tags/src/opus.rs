//! Opus R128 gain encoding
//!
//! Opus players apply `R128_TRACK_GAIN` / `R128_ALBUM_GAIN` on top of the
//! header output gain. Values are signed Q7.8 fixed point (1/256 dB steps)
//! relative to -23 LUFS, written as decimal strings.

use crate::names::{R128_ALBUM_GAIN, R128_TRACK_GAIN};
use loudtag_core::ScanResult;

/// Encode a gain in dB as Q7.8, clamped to the i16 range
pub fn encode_q78(gain_db: f64) -> i16 {
    (gain_db * 256.0)
        .round()
        .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Decode a Q7.8 value to dB
pub fn decode_q78(q78: i16) -> f64 {
    f64::from(q78) / 256.0
}

/// R128 tag values for an Opus result
///
/// Peaks, ranges and reference loudness have no Opus counterpart and are
/// never written.
pub fn r128_values(result: &ScanResult) -> Vec<(String, String)> {
    let mut values = vec![(
        R128_TRACK_GAIN.to_string(),
        encode_q78(result.track_gain).to_string(),
    )];
    if let Some(album) = result.album {
        values.push((R128_ALBUM_GAIN.to_string(), encode_q78(album.gain).to_string()));
    }
    values
}
