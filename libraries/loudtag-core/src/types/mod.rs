/// Domain types for loudtag
mod media;
mod options;
mod result;

pub use media::{Codec, Container};
pub use options::{Casing, ClipPolicy, GainUnit, Id3v2Version, RunConfig, TagMode};
pub use result::{AlbumResult, ClipState, Measurement, ScanResult};
