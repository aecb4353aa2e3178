/// A planned tag change for one file
use crate::strategy::TagFormat;
use loudtag_core::{Codec, Container, Id3v2Version};
use std::path::PathBuf;

/// Format options that affect how a tag is saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    /// Remove sibling tag containers (ID3v1/APEv2 next to ID3v2, ID3 next to APEv2)
    pub strip: bool,
    /// ID3v2 version for ID3v2 targets
    pub id3v2_version: Id3v2Version,
}

/// Names to remove and name/value pairs to write, applied in one save
#[derive(Debug, Clone, PartialEq)]
pub struct TagUpdate {
    /// Target file
    pub path: PathBuf,
    /// Container family of the target
    pub container: Container,
    /// Codec of the target
    pub codec: Codec,
    /// Tag format to write with
    pub format: TagFormat,
    /// Names removed first (always a superset of the inserted names)
    pub remove: Vec<String>,
    /// Pairs written after removal, in this order
    pub insert: Vec<(String, String)>,
    /// Save options
    pub options: SaveOptions,
}

impl TagUpdate {
    /// Whether this update only removes tags
    pub fn is_delete(&self) -> bool {
        self.insert.is_empty()
    }

    /// Value that will be written for `name`
    pub fn value(&self, name: &str) -> Option<&str> {
        self.insert
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
