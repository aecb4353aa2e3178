//! ReplayGain 2.0 / R128 gain calculation
//!
//! - Gain = Reference Level - Integrated Loudness + Pre-gain
//!
//! dB and LU are numerically identical, only the displayed unit differs.

use crate::OPUS_REFERENCE_LUFS;
use loudtag_core::Codec;

/// Gain needed to bring `measured` LUFS to `reference` LUFS, plus `pre_gain`
pub fn gain(measured: f64, reference: f64, pre_gain: f64) -> f64 {
    reference - measured + pre_gain
}

/// Reference loudness for a codec
///
/// Opus output gain is defined against -23 LUFS regardless of configuration.
pub fn reference_for(codec: Codec, configured: f64) -> f64 {
    if codec.is_opus() {
        OPUS_REFERENCE_LUFS
    } else {
        configured
    }
}

/// Convert decibels to a linear amplitude factor
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert a linear amplitude factor to decibels
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * linear.log10()
}
