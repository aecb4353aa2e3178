//! Tag store backed by lofty
//!
//! Each update reads the file's existing native tag, removes and inserts the
//! planned items, and saves the tag back with a single write. Unrelated items
//! are preserved.
//!
//! | Format         | lofty type       | Files                         |
//! |----------------|------------------|-------------------------------|
//! | ID3v2          | `Id3v2Tag` TXXX  | MP3, WAV, AIFF                |
//! | Vorbis Comment | `VorbisComments` | FLAC, Ogg Vorbis, Speex, Opus |
//! | MP4            | `Ilst` freeform  | M4A/MP4                       |
//! | APEv2          | `ApeTag`         | WavPack, Monkey's Audio, MPC  |
//!
//! ASF and Ogg FLAC are routed but cannot be written by lofty.

use crate::error::{Result, TagError};
use crate::router::route;
use crate::store::TagStore;
use crate::strategy::TagFormat;
use crate::update::{SaveOptions, TagUpdate};
use lofty::ape::{ApeFile, ApeItem, ApeTag};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::error::ErrorKind;
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::id3::v2::{Frame, Id3v2Tag};
use lofty::iff::aiff::AiffFile;
use lofty::iff::wav::WavFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::mpeg::MpegFile;
use lofty::musepack::MpcFile;
use lofty::ogg::{OpusFile, SpeexFile, VorbisComments, VorbisFile};
use lofty::tag::{ItemValue, TagExt, TagType};
use lofty::wavpack::WavPackFile;
use loudtag_core::{Codec, Container, Id3v2Version};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// iTunes freeform namespace used for ReplayGain atoms
const ITUNES_MEAN: &str = "com.apple.iTunes";

/// Writes tag updates with lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    /// Create a new store
    pub fn new() -> Self {
        Self
    }

    /// Read the current values of `names` from a file's native tag
    ///
    /// Missing names are absent from the returned map.
    pub fn read_values(
        &self,
        path: &Path,
        container: Container,
        codec: Codec,
        names: &[&str],
    ) -> Result<BTreeMap<String, String>> {
        let format =
            route(container, codec).ok_or_else(|| TagError::unsupported(container, codec))?;
        let tag = NativeTag::load(path, format, container, codec)?;
        Ok(names
            .iter()
            .filter_map(|name| tag.get(name).map(|v| ((*name).to_string(), v)))
            .collect())
    }

    /// Remove sibling tag containers once the new values are saved
    ///
    /// Tag types lofty cannot remove from this container are skipped.
    fn strip(path: &Path, container: Container) -> Result<()> {
        let siblings: &[TagType] = match container {
            Container::Mp3 => &[TagType::Id3v1, TagType::Ape],
            Container::Ape | Container::Mpc => &[TagType::Id3v1, TagType::Id3v2],
            _ => &[TagType::Id3v1],
        };
        for tag_type in siblings {
            match tag_type.remove_from_path(path) {
                Ok(()) => debug!("{}: stripped {:?}", path.display(), tag_type),
                Err(e) if matches!(e.kind(), ErrorKind::UnsupportedTag) => {
                    debug!("{}: {:?} cannot be stripped here", path.display(), tag_type);
                }
                Err(e) => {
                    return Err(TagError::Strip {
                        tag: format!("{:?}", tag_type),
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

impl TagStore for LoftyTagStore {
    fn apply(&mut self, update: &TagUpdate) -> Result<()> {
        if !update.path.exists() {
            return Err(TagError::FileNotFound(update.path.display().to_string()));
        }

        let mut tag =
            NativeTag::load(&update.path, update.format, update.container, update.codec)?;
        tag.remove(&update.remove);
        for (name, value) in &update.insert {
            debug!("{}: {} = {}", update.path.display(), name, value);
            tag.insert(name, value)?;
        }
        tag.save(&update.path, update.options)?;

        if update.options.strip {
            Self::strip(&update.path, update.container)?;
        }
        Ok(())
    }
}

/// The lofty tag a format is persisted in
enum NativeTag {
    Id3v2(Id3v2Tag),
    Vorbis(VorbisComments),
    Mp4(Ilst),
    Ape(ApeTag),
}

impl NativeTag {
    /// Read the existing tag, or start an empty one
    fn load(path: &Path, format: TagFormat, container: Container, codec: Codec) -> Result<Self> {
        let unsupported = || TagError::unsupported(container, codec);
        let mut file = File::open(path)?;
        let opts = ParseOptions::new().read_properties(false);

        let tag = match (format, container) {
            (TagFormat::Id3v2, Container::Mp3) => Self::Id3v2(
                MpegFile::read_from(&mut file, opts)?
                    .id3v2()
                    .cloned()
                    .unwrap_or_default(),
            ),
            (TagFormat::Id3v2, Container::Wav) => Self::Id3v2(
                WavFile::read_from(&mut file, opts)?
                    .id3v2()
                    .cloned()
                    .unwrap_or_default(),
            ),
            (TagFormat::Id3v2, Container::Aiff) => Self::Id3v2(
                AiffFile::read_from(&mut file, opts)?
                    .id3v2()
                    .cloned()
                    .unwrap_or_default(),
            ),
            (TagFormat::VorbisComment, Container::Flac) => Self::Vorbis(
                FlacFile::read_from(&mut file, opts)?
                    .vorbis_comments()
                    .cloned()
                    .unwrap_or_default(),
            ),
            (TagFormat::VorbisComment, Container::Ogg) => match codec {
                Codec::Vorbis => {
                    Self::Vorbis(VorbisFile::read_from(&mut file, opts)?.vorbis_comments().clone())
                }
                Codec::Speex => {
                    Self::Vorbis(SpeexFile::read_from(&mut file, opts)?.vorbis_comments().clone())
                }
                _ => return Err(unsupported()),
            },
            (TagFormat::Opus, Container::Ogg) => {
                Self::Vorbis(OpusFile::read_from(&mut file, opts)?.vorbis_comments().clone())
            }
            (TagFormat::Mp4, Container::Mp4) => {
                Self::Mp4(Mp4File::read_from(&mut file, opts)?.ilst().cloned().unwrap_or_default())
            }
            (TagFormat::Ape, Container::WavPack) => Self::Ape(
                WavPackFile::read_from(&mut file, opts)?
                    .ape()
                    .cloned()
                    .unwrap_or_default(),
            ),
            (TagFormat::Ape, Container::Ape) => {
                Self::Ape(ApeFile::read_from(&mut file, opts)?.ape().cloned().unwrap_or_default())
            }
            (TagFormat::Ape, Container::Mpc) => {
                Self::Ape(MpcFile::read_from(&mut file, opts)?.ape().cloned().unwrap_or_default())
            }
            _ => return Err(unsupported()),
        };
        Ok(tag)
    }

    fn freeform(name: &str) -> AtomIdent<'static> {
        AtomIdent::Freeform {
            mean: Cow::Borrowed(ITUNES_MEAN),
            name: Cow::Owned(name.to_string()),
        }
    }

    /// Remove every item named in `names`, ignoring ASCII case
    ///
    /// Vorbis comment and APE keys already compare case-insensitively in
    /// lofty; TXXX descriptions and freeform atom names do not.
    fn remove(&mut self, names: &[String]) {
        let named = |candidate: &str| names.iter().any(|n| n.eq_ignore_ascii_case(candidate));
        match self {
            Self::Id3v2(tag) => tag.retain(|frame| {
                !matches!(frame, Frame::UserText(text) if named(&text.description))
            }),
            Self::Vorbis(tag) => {
                for name in names {
                    tag.remove(name).for_each(drop);
                }
            }
            Self::Mp4(ilst) => ilst.retain(|atom| {
                !matches!(
                    atom.ident(),
                    AtomIdent::Freeform { mean, name } if *mean == ITUNES_MEAN && named(name)
                )
            }),
            Self::Ape(tag) => {
                for name in names {
                    tag.remove(name);
                }
            }
        }
    }

    fn insert(&mut self, name: &str, value: &str) -> Result<()> {
        match self {
            Self::Id3v2(tag) => {
                tag.insert_user_text(name.to_string(), value.to_string());
            }
            Self::Vorbis(tag) => {
                tag.insert(name.to_string(), value.to_string());
            }
            Self::Mp4(ilst) => {
                ilst.insert(Atom::new(
                    Self::freeform(name),
                    AtomData::UTF8(value.to_string()),
                ));
            }
            Self::Ape(tag) => {
                let item = ApeItem::new(name.to_string(), ItemValue::Text(value.to_string()))
                    .map_err(|_| TagError::InvalidItem(name.to_string()))?;
                tag.insert(item);
            }
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Option<String> {
        match self {
            Self::Id3v2(tag) => tag.get_user_text(name).map(str::to_string),
            Self::Vorbis(tag) => tag.get(name).map(str::to_string),
            Self::Mp4(ilst) => ilst.get(&Self::freeform(name)).and_then(|atom| {
                atom.data().find_map(|data| match data {
                    AtomData::UTF8(text) => Some(text.clone()),
                    _ => None,
                })
            }),
            Self::Ape(tag) => tag.get(name).and_then(|item| match item.value() {
                ItemValue::Text(text) => Some(text.clone()),
                _ => None,
            }),
        }
    }

    fn save(&self, path: &Path, options: SaveOptions) -> Result<()> {
        let write_options =
            WriteOptions::default().use_id3v23(options.id3v2_version == Id3v2Version::V3);
        match self {
            Self::Id3v2(tag) => tag.save_to_path(path, write_options)?,
            Self::Vorbis(tag) => tag.save_to_path(path, write_options)?,
            Self::Mp4(ilst) => ilst.save_to_path(path, write_options)?,
            Self::Ape(tag) => tag.save_to_path(path, write_options)?,
        }
        Ok(())
    }
}
