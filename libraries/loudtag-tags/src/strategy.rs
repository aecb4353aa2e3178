//! Per-format tag strategies
//!
//! Each strategy knows which names it removes, which it writes and how the
//! values are formatted. The lofty store only has to persist the result.

use crate::names::{self, both_casings, cased, R128_NAMES, REPLAYGAIN_NAMES};
use crate::opus;
use loudtag_core::{Casing, GainUnit, ScanResult, TagMode};
use std::fmt;

/// Native tag format a file is written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFormat {
    /// ID3v2 TXXX frames (MP3, and the ID3 chunk of WAV/AIFF)
    Id3v2,
    /// Vorbis Comments (FLAC, Ogg Vorbis/FLAC/Speex)
    VorbisComment,
    /// Vorbis Comments carrying R128 gains only
    Opus,
    /// iTunes freeform atoms (`----:com.apple.iTunes:NAME`)
    Mp4,
    /// ASF/WMA extended content attributes
    Asf,
    /// APEv2 items (WavPack, Monkey's Audio, Musepack)
    Ape,
}

impl TagFormat {
    /// Whether the lowercase option applies; the other formats have
    /// case-insensitive keys
    pub fn supports_casing(&self) -> bool {
        matches!(self, Self::Id3v2 | Self::Mp4 | Self::Asf)
    }

    /// Casing to write with under `requested`
    pub fn effective_casing(&self, requested: Casing) -> Casing {
        if self.supports_casing() {
            requested
        } else {
            Casing::Upper
        }
    }

    /// Names cleared before anything is written
    pub fn removal_names(&self) -> Vec<String> {
        match self {
            Self::Opus => {
                let mut all: Vec<&str> = REPLAYGAIN_NAMES.to_vec();
                all.extend(R128_NAMES);
                both_casings(&all)
            }
            _ => both_casings(&REPLAYGAIN_NAMES),
        }
    }

    /// Name/value pairs written for `result` under `mode`
    ///
    /// Album values are included only when the result carries them.
    pub fn values(
        &self,
        result: &ScanResult,
        mode: TagMode,
        casing: Casing,
    ) -> Vec<(String, String)> {
        if !matches!(
            mode,
            TagMode::Write | TagMode::WriteExtra | TagMode::WriteExtraLu
        ) {
            return Vec::new();
        }
        if *self == Self::Opus {
            return opus::r128_values(result);
        }

        let unit = match mode {
            TagMode::WriteExtraLu => GainUnit::Lu,
            _ => GainUnit::Db,
        };
        let casing = self.effective_casing(casing);
        let name = |n: &str| cased(n, casing);

        let mut values = vec![
            (name(names::TRACK_GAIN), format_gain(result.track_gain, unit)),
            (name(names::TRACK_PEAK), format_peak(result.track_peak)),
        ];
        if let Some(album) = result.album {
            values.push((name(names::ALBUM_GAIN), format_gain(album.gain, unit)));
            values.push((name(names::ALBUM_PEAK), format_peak(album.peak)));
        }

        if mode.writes_extra() {
            values.push((
                name(names::REFERENCE_LOUDNESS),
                format_reference(result.reference_loudness),
            ));
            values.push((
                name(names::TRACK_RANGE),
                format_gain(result.track_loudness_range, unit),
            ));
            if let Some(album) = result.album {
                values.push((
                    name(names::ALBUM_RANGE),
                    format_gain(album.loudness_range, unit),
                ));
            }
        }
        values
    }
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id3v2 => "ID3v2",
            Self::VorbisComment => "Vorbis Comment",
            Self::Opus => "Opus R128",
            Self::Mp4 => "MP4",
            Self::Asf => "ASF",
            Self::Ape => "APEv2",
        };
        f.write_str(name)
    }
}

/// Gain or range value, e.g. `-3.00 dB`
pub fn format_gain(value: f64, unit: GainUnit) -> String {
    format!("{:.2} {}", value, unit.as_str())
}

/// Linear peak value, e.g. `0.988553`
pub fn format_peak(peak: f64) -> String {
    format!("{:.6}", peak)
}

/// Reference loudness, e.g. `-18.00 LUFS`
pub fn format_reference(lufs: f64) -> String {
    format!("{:.2} LUFS", lufs)
}
