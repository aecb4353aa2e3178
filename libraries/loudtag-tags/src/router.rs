//! Container/codec routing
//!
//! A static table picks the tag strategy for each container and codec. The
//! first matching row wins; `None` in the codec column matches any codec.

use crate::error::{Result, TagError};
use crate::strategy::TagFormat;
use crate::update::{SaveOptions, TagUpdate};
use loudtag_core::{Codec, Container, RunConfig, ScanResult, TagMode};
use tracing::debug;

/// (container, codec, strategy)
const ROUTES: &[(Container, Option<Codec>, TagFormat)] = &[
    (Container::Mp3, None, TagFormat::Id3v2),
    (Container::Wav, None, TagFormat::Id3v2),
    (Container::Aiff, None, TagFormat::Id3v2),
    (Container::Flac, None, TagFormat::VorbisComment),
    (Container::Ogg, Some(Codec::Vorbis), TagFormat::VorbisComment),
    (Container::Ogg, Some(Codec::Flac), TagFormat::VorbisComment),
    (Container::Ogg, Some(Codec::Speex), TagFormat::VorbisComment),
    (Container::Ogg, Some(Codec::Opus), TagFormat::Opus),
    (Container::Mp4, None, TagFormat::Mp4),
    (Container::Asf, None, TagFormat::Asf),
    (Container::WavPack, None, TagFormat::Ape),
    (Container::Ape, None, TagFormat::Ape),
    (Container::Mpc, None, TagFormat::Ape),
];

/// Strategy for a container/codec combination
pub fn route(container: Container, codec: Codec) -> Option<TagFormat> {
    ROUTES
        .iter()
        .find(|(c, k, _)| *c == container && (k.is_none() || *k == Some(codec)))
        .map(|(_, _, format)| *format)
}

/// Plan the tag update for one scanned file
///
/// Returns `Ok(None)` in skip mode. Legacy modes and unroutable files are
/// per-file errors.
pub fn plan(result: &ScanResult, config: &RunConfig) -> Result<Option<TagUpdate>> {
    if let Some(reason) = config.tag_mode.unsupported_reason() {
        return Err(TagError::UnsupportedMode(reason));
    }
    if config.tag_mode == TagMode::Skip {
        return Ok(None);
    }

    let format = route(result.container, result.codec)
        .ok_or_else(|| TagError::unsupported(result.container, result.codec))?;

    let options = SaveOptions {
        strip: config.strip
            && (format == TagFormat::Ape
                || (format == TagFormat::Id3v2 && result.container == Container::Mp3)),
        id3v2_version: config.id3v2_version,
    };

    let update = TagUpdate {
        path: result.file_path.clone(),
        container: result.container,
        codec: result.codec,
        format,
        remove: format.removal_names(),
        insert: format.values(result, config.tag_mode, config.casing),
        options,
    };
    debug!(
        "{}: {} update, {} removals, {} values",
        result.file_path.display(),
        format,
        update.remove.len(),
        update.insert.len()
    );
    Ok(Some(update))
}
