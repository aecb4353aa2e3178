//! Command-line interface
use clap::Parser;
use loudtag_core::{ClipPolicy, Id3v2Version, TagMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loudtag")]
#[command(version)]
#[command(about = "ReplayGain 2.0 loudness scanner and tagger (EBU R128)", long_about = None)]
pub struct Cli {
    /// Calculate track gain only (default)
    #[arg(short = 'r', long = "track", overrides_with = "album")]
    pub track: bool,

    /// Calculate album gain (and track gain)
    #[arg(short = 'a', long = "album", overrides_with = "track")]
    pub album: bool,

    /// Ignore clipping warning
    #[arg(short = 'c', long = "clip")]
    pub ignore_clip: bool,

    /// Lower track/album gain to avoid clipping (<= -1 dBTP)
    #[arg(short = 'k', long = "noclip")]
    pub noclip: bool,

    /// Avoid clipping; max. true peak level = n dBTP
    #[arg(
        short = 'K',
        long = "maxtpl",
        value_name = "DBTP",
        allow_hyphen_values = true
    )]
    pub max_true_peak: Option<f64>,

    /// Apply n dB/LU pre-gain value (-5 for -23 LUFS target)
    #[arg(
        short = 'd',
        long = "pregain",
        visible_alias = "db-gain",
        value_name = "DB",
        allow_hyphen_values = true
    )]
    pub pre_gain: Option<f64>,

    /// Tag mode: d=delete, i=write, e=write extra, l=extra with LU units, s=skip
    #[arg(short = 's', long = "tagmode", value_name = "d|i|e|l|s")]
    pub tag_mode: Option<TagMode>,

    /// Force lowercase tags (MP2/MP3/MP4/WMA/WAV/AIFF); not standard-compliant
    #[arg(short = 'L', long = "lowercase")]
    pub lowercase: bool,

    /// Strip tag types other than ID3v2 from MP2/MP3 and other than APEv2 from WavPack/APE/MPC
    #[arg(short = 'S', long = "striptags")]
    pub strip: bool,

    /// Write ID3v2.3 or ID3v2.4 tags to MP2/MP3/WAV/AIFF
    #[arg(short = 'I', long = "id3v2version", value_name = "3|4")]
    pub id3v2_version: Option<Id3v2Version>,

    /// Database-friendly tab-delimited list output
    #[arg(short = 'o', long = "output")]
    pub output: bool,

    /// Don't print scanning status messages
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Configuration file (defaults to ./loudtag.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Audio files to scan
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Clipping policy implied by -c, -k and -K
    pub fn clip_policy(&self) -> ClipPolicy {
        if self.noclip || self.max_true_peak.is_some() {
            ClipPolicy::Correct
        } else if self.ignore_clip {
            ClipPolicy::Ignore
        } else {
            ClipPolicy::Warn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::try_parse_from(["loudtag", "a.flac"]).unwrap();
        assert!(!cli.album);
        assert_eq!(cli.files, vec![PathBuf::from("a.flac")]);
        assert_eq!(cli.clip_policy(), ClipPolicy::Warn);
        assert!(cli.tag_mode.is_none());
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["loudtag", "-a"]).is_err());
    }

    #[test]
    fn test_full_flag_set() {
        let cli = Cli::try_parse_from([
            "loudtag", "-a", "-k", "-s", "e", "-L", "-S", "-I", "3", "-d", "-5", "-o", "x.mp3",
            "y.mp3",
        ])
        .unwrap();
        assert!(cli.album && cli.lowercase && cli.strip && cli.output);
        assert_eq!(cli.tag_mode, Some(TagMode::WriteExtra));
        assert_eq!(cli.id3v2_version, Some(Id3v2Version::V3));
        assert_eq!(cli.pre_gain, Some(-5.0));
        assert_eq!(cli.clip_policy(), ClipPolicy::Correct);
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_maxtpl_implies_correction() {
        let cli = Cli::try_parse_from(["loudtag", "-c", "-K", "-2", "a.ogg"]).unwrap();
        assert_eq!(cli.max_true_peak, Some(-2.0));
        assert_eq!(cli.clip_policy(), ClipPolicy::Correct);
    }

    #[test]
    fn test_db_gain_alias() {
        let cli = Cli::try_parse_from(["loudtag", "--db-gain", "2.5", "a.ogg"]).unwrap();
        assert_eq!(cli.pre_gain, Some(2.5));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["loudtag", "-s", "x", "a.ogg"]).is_err());
        assert!(Cli::try_parse_from(["loudtag", "-I", "2", "a.ogg"]).is_err());
        assert!(Cli::try_parse_from(["loudtag", "-d", "loud", "a.ogg"]).is_err());
    }

    #[test]
    fn test_last_of_track_and_album_wins() {
        let cli = Cli::try_parse_from(["loudtag", "-a", "-r", "a.ogg"]).unwrap();
        assert!(!cli.album);
        let cli = Cli::try_parse_from(["loudtag", "-r", "-a", "a.ogg"]).unwrap();
        assert!(cli.album);
    }
}
