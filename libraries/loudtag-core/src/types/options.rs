/// Per-run options threaded through the engine
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ReplayGain 2.0 reference loudness (-18 LUFS)
pub const DEFAULT_REFERENCE_LUFS: f64 = -18.0;

/// Default true peak ceiling in dBTP (EBU Tech 3343)
pub const DEFAULT_MAX_TRUE_PEAK_DBTP: f64 = -1.0;

/// What to do with the tags of each scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TagMode {
    /// Remove all ReplayGain / R128 tags (`d`)
    Delete,
    /// Write track (and album) gain and peak (`i`)
    Write,
    /// Like `Write`, plus reference loudness and ranges (`e`)
    WriteExtra,
    /// Like `WriteExtra`, with LU instead of dB units (`l`)
    WriteExtraLu,
    /// Scan only, leave files untouched (`s`)
    #[default]
    Skip,
    /// Legacy APEv2-only mode (`a`), rejected per file
    LegacyApe,
    /// Legacy Vorbis-Comment-only mode (`v`), rejected per file
    LegacyVorbisComment,
}

impl TagMode {
    /// Single-letter form used on the command line
    pub fn letter(&self) -> char {
        match self {
            Self::Delete => 'd',
            Self::Write => 'i',
            Self::WriteExtra => 'e',
            Self::WriteExtraLu => 'l',
            Self::Skip => 's',
            Self::LegacyApe => 'a',
            Self::LegacyVorbisComment => 'v',
        }
    }

    /// Whether reference loudness and ranges are written as well
    pub fn writes_extra(&self) -> bool {
        matches!(self, Self::WriteExtra | Self::WriteExtraLu)
    }

    /// Human-readable reason for the legacy modes that are no longer supported
    pub fn unsupported_reason(&self) -> Option<&'static str> {
        match self {
            Self::LegacyApe => Some("APEv2 tags are not supported"),
            Self::LegacyVorbisComment => Some("Vorbis Comment tags are not supported"),
            _ => None,
        }
    }
}

impl FromStr for TagMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "delete" => Ok(Self::Delete),
            "i" | "write" => Ok(Self::Write),
            "e" | "extra" | "write-extra" => Ok(Self::WriteExtra),
            "l" | "extra-lu" | "write-extra-lu" => Ok(Self::WriteExtraLu),
            "s" | "skip" => Ok(Self::Skip),
            "a" | "ape" => Ok(Self::LegacyApe),
            "v" | "vorbis" => Ok(Self::LegacyVorbisComment),
            other => Err(CoreError::InvalidTagMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for TagMode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TagMode> for String {
    fn from(mode: TagMode) -> Self {
        mode.letter().to_string()
    }
}

impl fmt::Display for TagMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Displayed unit for gains and ranges; dB and LU are numerically identical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GainUnit {
    /// Decibels
    #[default]
    Db,
    /// Loudness units
    Lu,
}

impl GainUnit {
    /// Unit label as written into tags
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Db => "dB",
            Self::Lu => "LU",
        }
    }
}

impl fmt::Display for GainUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag name casing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Casing {
    /// `REPLAYGAIN_TRACK_GAIN` (ReplayGain 2.0 standard)
    #[default]
    Upper,
    /// `replaygain_track_gain` (non-standard, needed by some players)
    Lower,
}

/// How predicted clipping is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipPolicy {
    /// Say nothing
    Ignore,
    /// Emit a non-fatal warning
    #[default]
    Warn,
    /// Lower the gain so the peak stays below the ceiling
    Correct,
}

/// ID3v2 version to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Id3v2Version {
    /// ID3v2.3
    V3,
    /// ID3v2.4
    #[default]
    V4,
}

impl TryFrom<u8> for Id3v2Version {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            other => Err(CoreError::InvalidId3v2Version(other.to_string())),
        }
    }
}

impl From<Id3v2Version> for u8 {
    fn from(version: Id3v2Version) -> Self {
        match version {
            Id3v2Version::V3 => 3,
            Id3v2Version::V4 => 4,
        }
    }
}

impl FromStr for Id3v2Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| CoreError::InvalidId3v2Version(s.to_string()))
            .and_then(Self::try_from)
    }
}

/// Explicit configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Calculate album gain in addition to track gain
    pub album: bool,
    /// Added to every computed gain, in dB/LU
    pub pre_gain: f64,
    /// Target loudness in LUFS (Opus always uses -23 LUFS instead)
    pub reference_loudness: f64,
    /// Clipping handling
    pub clip_policy: ClipPolicy,
    /// Ceiling for the true peak after gain, in dBTP
    pub max_true_peak_level: f64,
    /// Tag mode
    pub tag_mode: TagMode,
    /// Tag name casing
    pub casing: Casing,
    /// Strip sibling tag containers (ID3v1/APEv2 from MP3, ID3 from APE-tagged files)
    pub strip: bool,
    /// ID3v2 version to write
    pub id3v2_version: Id3v2Version,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            album: false,
            pre_gain: 0.0,
            reference_loudness: DEFAULT_REFERENCE_LUFS,
            clip_policy: ClipPolicy::Warn,
            max_true_peak_level: DEFAULT_MAX_TRUE_PEAK_DBTP,
            tag_mode: TagMode::default(),
            casing: Casing::Upper,
            strip: false,
            id3v2_version: Id3v2Version::V4,
        }
    }
}

impl RunConfig {
    /// Unit label for this run (LU only in `WriteExtraLu` mode)
    pub fn unit(&self) -> GainUnit {
        match self.tag_mode {
            TagMode::WriteExtraLu => GainUnit::Lu,
            _ => GainUnit::Db,
        }
    }

    /// Reject non-finite numeric settings
    pub fn validate(&self) -> Result<()> {
        if !self.pre_gain.is_finite() {
            return Err(CoreError::invalid_number("pre-gain", self.pre_gain));
        }
        if !self.reference_loudness.is_finite() {
            return Err(CoreError::invalid_number(
                "reference loudness",
                self.reference_loudness,
            ));
        }
        if !self.max_true_peak_level.is_finite() {
            return Err(CoreError::invalid_number(
                "max true peak level",
                self.max_true_peak_level,
            ));
        }
        Ok(())
    }
}
