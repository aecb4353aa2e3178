/// Container and codec identity of a scanned file
use serde::{Deserialize, Serialize};
use std::fmt;

/// Demuxed container family of an audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// MPEG audio elementary stream (.mp3, .mp2)
    Mp3,
    /// Native FLAC stream
    Flac,
    /// Ogg bitstream (codec decides the tag strategy)
    Ogg,
    /// ISO base media (.m4a, .mp4)
    Mp4,
    /// Advanced Systems Format (.wma, .asf)
    Asf,
    /// RIFF WAVE
    Wav,
    /// WavPack
    WavPack,
    /// AIFF / AIFF-C
    Aiff,
    /// Monkey's Audio
    Ape,
    /// Musepack
    Mpc,
    /// Raw ADTS AAC
    Adts,
    /// Anything else
    Unknown,
}

impl Container {
    /// Guess the container from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "mp2" => Self::Mp3,
            "flac" => Self::Flac,
            "ogg" | "oga" | "opus" | "spx" => Self::Ogg,
            "m4a" | "mp4" | "m4b" => Self::Mp4,
            "wma" | "asf" => Self::Asf,
            "wav" => Self::Wav,
            "wv" => Self::WavPack,
            "aif" | "aiff" | "aifc" => Self::Aiff,
            "ape" => Self::Ape,
            "mpc" => Self::Mpc,
            "aac" => Self::Adts,
            _ => Self::Unknown,
        }
    }

    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Mp4 => "mp4",
            Self::Asf => "asf",
            Self::Wav => "wav",
            Self::WavPack => "wv",
            Self::Aiff => "aiff",
            Self::Ape => "ape",
            Self::Mpc => "mpc",
            Self::Adts => "aac",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this is an Ogg container
    pub fn is_ogg(&self) -> bool {
        matches!(self, Self::Ogg)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio codec inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// MPEG-1/2 Layer I-III
    Mp3,
    /// FLAC (native or in Ogg)
    Flac,
    /// Vorbis
    Vorbis,
    /// Opus
    Opus,
    /// Speex
    Speex,
    /// AAC
    Aac,
    /// Apple Lossless
    Alac,
    /// Windows Media Audio
    Wma,
    /// Uncompressed PCM of any sample format
    Pcm,
    /// WavPack
    WavPack,
    /// Monkey's Audio
    Ape,
    /// Musepack
    Musepack,
    /// Anything else
    Unknown,
}

impl Codec {
    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Vorbis => "vorbis",
            Self::Opus => "opus",
            Self::Speex => "speex",
            Self::Aac => "aac",
            Self::Alac => "alac",
            Self::Wma => "wma",
            Self::Pcm => "pcm",
            Self::WavPack => "wavpack",
            Self::Ape => "ape",
            Self::Musepack => "musepack",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this is Opus (fixed -23 LUFS reference, R128 tags)
    pub fn is_opus(&self) -> bool {
        matches!(self, Self::Opus)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
