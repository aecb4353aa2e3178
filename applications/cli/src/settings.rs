//! Configuration file and environment defaults
use crate::cli::Cli;
use crate::error::Result;
use loudtag_core::{Casing, Id3v2Version, RunConfig, TagMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "loudtag.toml";

/// Persistent defaults, overridden by command-line flags
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Target loudness in LUFS
    #[serde(default = "default_reference_loudness")]
    pub reference_loudness: f64,

    /// True peak ceiling in dBTP
    #[serde(default = "default_max_true_peak_level")]
    pub max_true_peak_level: f64,

    /// Default tag mode letter
    #[serde(default)]
    pub tag_mode: TagMode,

    /// Write lowercase tag names where the format allows it
    #[serde(default)]
    pub lowercase: bool,

    /// Strip sibling tag containers
    #[serde(default)]
    pub strip: bool,

    /// ID3v2 version (3 or 4)
    #[serde(default)]
    pub id3v2_version: Id3v2Version,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_loudness: default_reference_loudness(),
            max_true_peak_level: default_max_true_peak_level(),
            tag_mode: TagMode::default(),
            lowercase: false,
            strip: false,
            id3v2_version: Id3v2Version::default(),
        }
    }
}

impl Settings {
    /// Load from an explicit file (must exist), else `./loudtag.toml` if
    /// present, then `LOUDTAG_*` environment variables
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(explicit, None)
    }

    /// Like [`Settings::load`], reading variables from `env` instead of the
    /// process environment when given
    fn load_from(
        explicit: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        match explicit {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder =
                    builder.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    debug!("Loading configuration from {}", default_path.display());
                    builder = builder.add_source(config::File::from(default_path));
                }
            }
        }

        // LOUDTAG_REFERENCE_LOUDNESS=-16, LOUDTAG_TAG_MODE=i, ...
        builder = builder.add_source(
            config::Environment::with_prefix("LOUDTAG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Combine with command-line flags into a validated run configuration
    pub fn run_config(&self, cli: &Cli) -> Result<RunConfig> {
        let config = RunConfig {
            album: cli.album,
            pre_gain: cli.pre_gain.unwrap_or(0.0),
            reference_loudness: self.reference_loudness,
            clip_policy: cli.clip_policy(),
            max_true_peak_level: cli.max_true_peak.unwrap_or(self.max_true_peak_level),
            tag_mode: cli.tag_mode.unwrap_or(self.tag_mode),
            casing: if cli.lowercase || self.lowercase {
                Casing::Lower
            } else {
                Casing::Upper
            },
            strip: cli.strip || self.strip,
            id3v2_version: cli.id3v2_version.unwrap_or(self.id3v2_version),
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_reference_loudness() -> f64 {
    loudtag_loudness::REPLAYGAIN_REFERENCE_LUFS
}

fn default_max_true_peak_level() -> f64 {
    loudtag_loudness::DEFAULT_MAX_TRUE_PEAK_DBTP
}
