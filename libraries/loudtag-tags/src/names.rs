//! ReplayGain 2.0 and R128 tag names

use loudtag_core::Casing;

/// Track gain (`"-3.00 dB"`)
pub const TRACK_GAIN: &str = "REPLAYGAIN_TRACK_GAIN";
/// Track true peak (`"0.891251"`)
pub const TRACK_PEAK: &str = "REPLAYGAIN_TRACK_PEAK";
/// Track loudness range
pub const TRACK_RANGE: &str = "REPLAYGAIN_TRACK_RANGE";
/// Album gain
pub const ALBUM_GAIN: &str = "REPLAYGAIN_ALBUM_GAIN";
/// Album true peak
pub const ALBUM_PEAK: &str = "REPLAYGAIN_ALBUM_PEAK";
/// Album loudness range
pub const ALBUM_RANGE: &str = "REPLAYGAIN_ALBUM_RANGE";
/// Reference loudness (`"-18.00 LUFS"`)
pub const REFERENCE_LOUDNESS: &str = "REPLAYGAIN_REFERENCE_LOUDNESS";

/// Every ReplayGain name this tool writes or removes
pub const REPLAYGAIN_NAMES: [&str; 7] = [
    TRACK_GAIN,
    TRACK_PEAK,
    TRACK_RANGE,
    ALBUM_GAIN,
    ALBUM_PEAK,
    ALBUM_RANGE,
    REFERENCE_LOUDNESS,
];

/// Opus track output gain, Q7.8 relative to -23 LUFS
pub const R128_TRACK_GAIN: &str = "R128_TRACK_GAIN";
/// Opus album output gain, Q7.8 relative to -23 LUFS
pub const R128_ALBUM_GAIN: &str = "R128_ALBUM_GAIN";

/// R128 names used for Opus
pub const R128_NAMES: [&str; 2] = [R128_TRACK_GAIN, R128_ALBUM_GAIN];

/// Apply a casing policy to an (uppercase) tag name
pub fn cased(name: &str, casing: Casing) -> String {
    match casing {
        Casing::Upper => name.to_string(),
        Casing::Lower => name.to_ascii_lowercase(),
    }
}

/// `names` in both casings, uppercase first
pub fn both_casings(names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|n| cased(n, Casing::Upper))
        .chain(names.iter().map(|n| cased(n, Casing::Lower)))
        .collect()
}
