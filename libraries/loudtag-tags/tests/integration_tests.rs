//! Tag writing against real files

use lofty::config::WriteOptions;
use lofty::id3::v1::Id3v1Tag;
use lofty::id3::v2::Id3v2Tag;
use lofty::tag::TagExt;
use loudtag_core::{
    AlbumResult, Casing, ClipState, Codec, Container, Id3v2Version, RunConfig, ScanResult,
    TagMode,
};
use loudtag_tags::names::{
    ALBUM_GAIN, R128_ALBUM_GAIN, R128_TRACK_GAIN, REPLAYGAIN_NAMES, TRACK_GAIN, TRACK_PEAK,
};
use loudtag_tags::opus::{decode_q78, encode_q78};
use loudtag_tags::{plan, LoftyTagStore, TagStore};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_wav(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..8000 {
        writer.write_sample(((i % 100) as i16 - 50) * 100).unwrap();
    }
    writer.finalize().unwrap();
    path
}

/// FLAC stream marker followed by a single STREAMINFO block (44.1 kHz, stereo, 16 bit)
fn write_flac(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    bytes.extend_from_slice(&[0; 6]);
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0, 0, 0, 0]);
    bytes.extend_from_slice(&[0; 16]);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn ogg_crc(data: &[u8]) -> u32 {
    let mut crc = 0_u32;
    for &byte in data {
        crc ^= u32::from(byte) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ 0x04C1_1DB7
            };
        }
    }
    crc
}

/// One Ogg page holding a single packet shorter than 255 bytes
fn ogg_page(header_type: u8, sequence: u32, granule: u64, packet: &[u8]) -> Vec<u8> {
    let mut page = b"OggS".to_vec();
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&0x4C54_4147_u32.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]);
    page.push(1);
    page.push(packet.len() as u8);
    page.extend_from_slice(packet);
    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

/// Ogg Opus stream: identification header, empty comment header, one audio packet
fn write_opus(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);

    let mut head = b"OpusHead".to_vec();
    head.push(1);
    head.push(2);
    head.extend_from_slice(&312_u16.to_le_bytes());
    head.extend_from_slice(&48000_u32.to_le_bytes());
    head.extend_from_slice(&0_i16.to_le_bytes());
    head.push(0);

    let mut tags = b"OpusTags".to_vec();
    tags.extend_from_slice(&7_u32.to_le_bytes());
    tags.extend_from_slice(b"loudtag");
    tags.extend_from_slice(&0_u32.to_le_bytes());

    let mut bytes = ogg_page(0x02, 0, 0, &head);
    bytes.extend(ogg_page(0x00, 1, 0, &tags));
    bytes.extend(ogg_page(0x04, 2, 1272, &[0xFC, 0xFF, 0xFE]));
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Twenty MPEG-1 Layer III frames (128 kbit/s, 44.1 kHz) of silence
fn write_mp3(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = Vec::new();
    for _ in 0..20 {
        let mut frame = vec![0_u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        bytes.extend(frame);
    }
    std::fs::write(&path, bytes).unwrap();
    path
}

fn has_id3v1(path: &Path) -> bool {
    let bytes = std::fs::read(path).unwrap();
    bytes.len() >= 128 && bytes[bytes.len() - 128..].starts_with(b"TAG")
}

fn scan_result(path: PathBuf, container: Container, codec: Codec, album: bool) -> ScanResult {
    ScanResult {
        file_path: path,
        container,
        codec,
        track_loudness: -15.0,
        track_loudness_range: 3.0,
        track_peak: 0.5,
        track_gain: -3.0,
        reference_loudness: -18.0,
        track_clip: ClipState::default(),
        album: album.then_some(AlbumResult {
            gain: -2.0,
            loudness: -16.0,
            loudness_range: 4.0,
            peak: 0.75,
            clip: ClipState::default(),
        }),
    }
}

fn wav_result(path: PathBuf, album: bool) -> ScanResult {
    scan_result(path, Container::Wav, Codec::Pcm, album)
}

fn config(tag_mode: TagMode) -> RunConfig {
    RunConfig {
        tag_mode,
        ..RunConfig::default()
    }
}

fn apply(result: &ScanResult, config: &RunConfig) {
    let update = plan(result, config).unwrap().unwrap();
    LoftyTagStore::new().apply(&update).unwrap();
}

fn read_as(
    path: &Path,
    container: Container,
    codec: Codec,
    names: &[&str],
) -> BTreeMap<String, String> {
    LoftyTagStore::new()
        .read_values(path, container, codec, names)
        .unwrap()
}

fn read(path: &Path, names: &[&str]) -> BTreeMap<String, String> {
    read_as(path, Container::Wav, Codec::Pcm, names)
}

#[test]
fn test_wav_id3v2_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "a.wav");

    apply(&wav_result(path.clone(), true), &config(TagMode::Write));

    let values = read(&path, &REPLAYGAIN_NAMES);
    assert_eq!(values.get(TRACK_GAIN).map(String::as_str), Some("-3.00 dB"));
    assert_eq!(values.get(TRACK_PEAK).map(String::as_str), Some("0.500000"));
    assert_eq!(values.get(ALBUM_GAIN).map(String::as_str), Some("-2.00 dB"));
    assert_eq!(values.len(), 4);
}

#[test]
fn test_rewrite_without_album_drops_stale_album_tags() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "b.wav");

    apply(&wav_result(path.clone(), true), &config(TagMode::Write));
    apply(&wav_result(path.clone(), false), &config(TagMode::Write));
    apply(&wav_result(path.clone(), false), &config(TagMode::Write));

    let values = read(&path, &REPLAYGAIN_NAMES);
    assert_eq!(values.len(), 2);
    assert!(!values.contains_key(ALBUM_GAIN));
}

#[test]
fn test_delete_mode_clears_everything() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "c.wav");

    apply(&wav_result(path.clone(), true), &config(TagMode::WriteExtra));
    assert_eq!(read(&path, &REPLAYGAIN_NAMES).len(), 7);

    apply(&wav_result(path.clone(), true), &config(TagMode::Delete));
    assert!(read(&path, &REPLAYGAIN_NAMES).is_empty());
}

#[test]
fn test_mixed_case_id3v2_frames_are_removed() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "mixed.wav");

    let mut tag = Id3v2Tag::default();
    tag.insert_user_text("ReplayGain_Track_Gain".to_string(), "+9.00 dB".to_string());
    tag.insert_user_text("ReplayGain_Album_Peak".to_string(), "1.000000".to_string());
    tag.save_to_path(&path, WriteOptions::default()).unwrap();
    let names = ["ReplayGain_Track_Gain", "ReplayGain_Album_Peak", TRACK_GAIN];
    assert_eq!(read(&path, &names).len(), 2);

    apply(&wav_result(path.clone(), false), &config(TagMode::Write));
    let values = read(&path, &names);
    assert_eq!(values.len(), 1);
    assert_eq!(values.get(TRACK_GAIN).map(String::as_str), Some("-3.00 dB"));

    apply(&wav_result(path.clone(), false), &config(TagMode::Delete));
    assert!(read(&path, &names).is_empty());
}

#[test]
fn test_lowercase_id3v23() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "d.wav");
    let cfg = RunConfig {
        tag_mode: TagMode::Write,
        casing: Casing::Lower,
        id3v2_version: Id3v2Version::V3,
        ..RunConfig::default()
    };
    apply(&wav_result(path.clone(), false), &cfg);

    let values = read(&path, &["replaygain_track_gain", TRACK_GAIN]);
    assert_eq!(
        values.get("replaygain_track_gain").map(String::as_str),
        Some("-3.00 dB")
    );
    assert!(!values.contains_key(TRACK_GAIN));
}

#[test]
fn test_flac_vorbis_comment_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_flac(dir.path(), "e.flac");
    let result = scan_result(path.clone(), Container::Flac, Codec::Flac, true);

    apply(&result, &config(TagMode::WriteExtra));
    let values = read_as(&path, Container::Flac, Codec::Flac, &REPLAYGAIN_NAMES);
    assert_eq!(values.len(), 7);
    assert_eq!(values.get(ALBUM_GAIN).map(String::as_str), Some("-2.00 dB"));

    apply(&result, &config(TagMode::Delete));
    assert!(read_as(&path, Container::Flac, Codec::Flac, &REPLAYGAIN_NAMES).is_empty());
}

#[test]
fn test_opus_writes_r128_gains_only() {
    let dir = TempDir::new().unwrap();
    let path = write_opus(dir.path(), "f.opus");
    let mut result = scan_result(path.clone(), Container::Ogg, Codec::Opus, true);
    result.reference_loudness = -23.0;
    result.track_gain = -5.0;

    apply(&result, &config(TagMode::WriteExtra));

    let mut names = REPLAYGAIN_NAMES.to_vec();
    names.extend([R128_TRACK_GAIN, R128_ALBUM_GAIN]);
    let values = read_as(&path, Container::Ogg, Codec::Opus, &names);
    assert_eq!(values.len(), 2);
    assert_eq!(values.get(R128_TRACK_GAIN).map(String::as_str), Some("-1280"));
    assert_eq!(values.get(R128_ALBUM_GAIN).map(String::as_str), Some("-512"));
}

#[test]
fn test_strip_removes_id3v1_from_mp3() {
    let dir = TempDir::new().unwrap();
    let path = write_mp3(dir.path(), "g.mp3");

    let mut v1 = Id3v1Tag::default();
    v1.title = Some("Song".to_string());
    v1.save_to_path(&path, WriteOptions::default()).unwrap();
    assert!(has_id3v1(&path));

    let cfg = RunConfig {
        tag_mode: TagMode::Write,
        strip: true,
        ..RunConfig::default()
    };
    apply(&scan_result(path.clone(), Container::Mp3, Codec::Mp3, false), &cfg);

    assert!(!has_id3v1(&path));
    let values = read_as(&path, Container::Mp3, Codec::Mp3, &[TRACK_GAIN]);
    assert_eq!(values.get(TRACK_GAIN).map(String::as_str), Some("-3.00 dB"));
}

#[test]
fn test_mp3_keeps_id3v1_without_strip() {
    let dir = TempDir::new().unwrap();
    let path = write_mp3(dir.path(), "h.mp3");

    let mut v1 = Id3v1Tag::default();
    v1.title = Some("Song".to_string());
    v1.save_to_path(&path, WriteOptions::default()).unwrap();

    apply(
        &scan_result(path.clone(), Container::Mp3, Codec::Mp3, false),
        &config(TagMode::Write),
    );
    assert!(has_id3v1(&path));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Q7.8 keeps gains within one step
    #[test]
    fn q78_round_trip_within_one_step(gain in -127.0_f64..127.0) {
        let decoded = decode_q78(encode_q78(gain));
        prop_assert!((decoded - gain).abs() <= 1.0 / 256.0);
    }
}
