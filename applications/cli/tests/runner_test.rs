//! Run engine tests with a fixed analyzer and the in-memory tag store

use loudtag::{run, OutputFormat, Reporter, RunError};
use loudtag_core::{ClipPolicy, Codec, Container, GainUnit, Measurement, RunConfig, TagMode};
use loudtag_loudness::{Analysis, Analyzer, LoudnessError};
use loudtag_tags::names::{ALBUM_GAIN, R128_ALBUM_GAIN, R128_TRACK_GAIN, TRACK_GAIN};
use loudtag_tags::MemoryTagStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Returns canned measurements; unknown paths fail to decode
#[derive(Default)]
struct FixedAnalyzer {
    measurements: HashMap<PathBuf, Measurement>,
}

impl FixedAnalyzer {
    fn with(
        mut self,
        name: &str,
        container: Container,
        codec: Codec,
        lufs: f64,
        peak: f64,
    ) -> Self {
        self.measurements.insert(
            PathBuf::from(name),
            Measurement {
                file_path: PathBuf::from(name),
                container,
                codec,
                integrated_loudness: lufs,
                loudness_range: 5.0,
                true_peak: peak,
                duration_secs: 60.0,
            },
        );
        self
    }
}

impl Analyzer for FixedAnalyzer {
    fn analyze(&self, path: &Path) -> loudtag_loudness::Result<Analysis> {
        self.measurements
            .get(path)
            .cloned()
            .map(Analysis::from_measurement)
            .ok_or_else(|| LoudnessError::Decode(format!("cannot decode {}", path.display())))
    }
}

fn files(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

fn config(tag_mode: TagMode, album: bool) -> RunConfig {
    RunConfig {
        album,
        tag_mode,
        ..RunConfig::default()
    }
}

fn human() -> Reporter<Vec<u8>> {
    Reporter::new(Vec::new(), OutputFormat::Human, GainUnit::Db)
}

#[test]
fn test_track_tags_written() {
    let analyzer =
        FixedAnalyzer::default().with("a.flac", Container::Flac, Codec::Flac, -15.0, 0.5);
    let mut store = MemoryTagStore::new();
    let mut reporter = human();

    let summary = run(
        &files(&["a.flac"]),
        &config(TagMode::Write, false),
        &analyzer,
        &mut store,
        &mut reporter,
    )
    .unwrap();

    assert!(!summary.has_failures());
    assert_eq!(summary.results.len(), 1);
    assert_eq!(store.value(Path::new("a.flac"), TRACK_GAIN), Some("-3.00 dB"));
    assert_eq!(store.value(Path::new("a.flac"), ALBUM_GAIN), None);

    let out = String::from_utf8(reporter.finish().unwrap()).unwrap();
    assert!(out.contains("Track: a.flac"));
    assert!(!out.contains("Album:"));
}

#[test]
fn test_skip_mode_writes_nothing() {
    let analyzer =
        FixedAnalyzer::default().with("a.flac", Container::Flac, Codec::Flac, -15.0, 0.5);
    let mut store = MemoryTagStore::new();

    let summary = run(
        &files(&["a.flac"]),
        &config(TagMode::Skip, true),
        &analyzer,
        &mut store,
        &mut human(),
    )
    .unwrap();

    assert_eq!(summary.results.len(), 1);
    assert!(store.applied().is_empty());
}

#[test]
fn test_album_tags_written_to_every_track() {
    let analyzer = FixedAnalyzer::default()
        .with("1.flac", Container::Flac, Codec::Flac, -15.0, 0.5)
        .with("2.flac", Container::Flac, Codec::Flac, -15.0, 0.25);
    let mut store = MemoryTagStore::new();
    let mut reporter = human();

    let summary = run(
        &files(&["1.flac", "2.flac"]),
        &config(TagMode::Write, true),
        &analyzer,
        &mut store,
        &mut reporter,
    )
    .unwrap();

    assert_eq!(summary.results.len(), 2);
    for name in ["1.flac", "2.flac"] {
        assert_eq!(store.value(Path::new(name), ALBUM_GAIN), Some("-3.00 dB"));
    }
    let album = summary.results[1].album.unwrap();
    assert_eq!(album.peak, 0.5);

    let out = String::from_utf8(reporter.finish().unwrap()).unwrap();
    assert_eq!(out.matches("\nAlbum:\n").count(), 1);
}

#[test]
fn test_opus_mixed_with_vorbis_is_fatal_before_any_write() {
    let analyzer = FixedAnalyzer::default()
        .with("a.opus", Container::Ogg, Codec::Opus, -20.0, 0.5)
        .with("b.ogg", Container::Ogg, Codec::Vorbis, -20.0, 0.5);
    let mut store = MemoryTagStore::new();

    let result = run(
        &files(&["a.opus", "b.ogg"]),
        &config(TagMode::Write, true),
        &analyzer,
        &mut store,
        &mut human(),
    );

    assert!(matches!(
        result,
        Err(RunError::Album(LoudnessError::MixedOpusAlbum))
    ));
    assert!(store.applied().is_empty());
}

#[test]
fn test_opus_album_uses_r128_tags() {
    let analyzer = FixedAnalyzer::default()
        .with("a.opus", Container::Ogg, Codec::Opus, -20.0, 0.5)
        .with("b.opus", Container::Ogg, Codec::Opus, -20.0, 0.5);
    let mut store = MemoryTagStore::new();
    store.seed("a.opus", TRACK_GAIN, "1.00 dB");

    run(
        &files(&["a.opus", "b.opus"]),
        &config(TagMode::Write, true),
        &analyzer,
        &mut store,
        &mut human(),
    )
    .unwrap();

    // -23 - (-20) = -3 dB, Q7.8
    assert_eq!(store.value(Path::new("a.opus"), R128_TRACK_GAIN), Some("-768"));
    assert_eq!(store.value(Path::new("a.opus"), R128_ALBUM_GAIN), Some("-768"));
    assert_eq!(store.value(Path::new("a.opus"), TRACK_GAIN), None);
}

#[test]
fn test_failed_file_does_not_stop_the_run() {
    let analyzer = FixedAnalyzer::default()
        .with("1.flac", Container::Flac, Codec::Flac, -15.0, 0.5)
        .with("3.flac", Container::Flac, Codec::Flac, -21.0, 0.5);
    let mut store = MemoryTagStore::new();

    let summary = run(
        &files(&["1.flac", "broken.flac", "3.flac"]),
        &config(TagMode::Write, false),
        &analyzer,
        &mut store,
        &mut human(),
    )
    .unwrap();

    assert!(summary.has_failures());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, PathBuf::from("broken.flac"));
    assert_eq!(summary.results.len(), 2);
    assert_eq!(store.value(Path::new("3.flac"), TRACK_GAIN), Some("3.00 dB"));
}

#[test]
fn test_save_failure_is_per_file() {
    let analyzer = FixedAnalyzer::default()
        .with("1.flac", Container::Flac, Codec::Flac, -15.0, 0.5)
        .with("2.flac", Container::Flac, Codec::Flac, -15.0, 0.5);
    let mut store = MemoryTagStore::new();
    store.fail_on("1.flac");

    let summary = run(
        &files(&["1.flac", "2.flac"]),
        &config(TagMode::Write, false),
        &analyzer,
        &mut store,
        &mut human(),
    )
    .unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.results.len(), 2);
    assert_eq!(store.value(Path::new("2.flac"), TRACK_GAIN), Some("-3.00 dB"));
}

#[test]
fn test_legacy_mode_fails_each_file() {
    let analyzer =
        FixedAnalyzer::default().with("a.flac", Container::Flac, Codec::Flac, -15.0, 0.5);
    let mut store = MemoryTagStore::new();

    let summary = run(
        &files(&["a.flac"]),
        &config(TagMode::LegacyApe, false),
        &analyzer,
        &mut store,
        &mut human(),
    )
    .unwrap();

    assert!(summary.has_failures());
    assert!(store.applied().is_empty());
}

#[test]
fn test_clipping_correction_lowers_gain() {
    let analyzer =
        FixedAnalyzer::default().with("a.flac", Container::Flac, Codec::Flac, -21.0, 0.9);
    let mut store = MemoryTagStore::new();
    let cfg = RunConfig {
        tag_mode: TagMode::Write,
        clip_policy: ClipPolicy::Correct,
        ..RunConfig::default()
    };

    let summary = run(&files(&["a.flac"]), &cfg, &analyzer, &mut store, &mut human()).unwrap();

    let result = &summary.results[0];
    assert!(result.track_clip.clipped);
    assert_eq!(store.value(Path::new("a.flac"), TRACK_GAIN), Some("-0.08 dB"));
}

#[test]
fn test_non_finite_pre_gain_is_rejected_before_scanning() {
    let analyzer = FixedAnalyzer::default();
    let mut store = MemoryTagStore::new();
    let cfg = RunConfig {
        pre_gain: f64::INFINITY,
        ..RunConfig::default()
    };

    let result = run(&files(&["a.flac"]), &cfg, &analyzer, &mut store, &mut human());
    assert!(matches!(result, Err(RunError::InvalidOption(_))));
}

#[test]
fn test_tab_output() {
    let analyzer = FixedAnalyzer::default()
        .with("1.flac", Container::Flac, Codec::Flac, -15.0, 0.5)
        .with("2.flac", Container::Flac, Codec::Flac, -15.0, 0.25);
    let mut store = MemoryTagStore::new();
    let mut reporter = Reporter::new(Vec::new(), OutputFormat::Tab, GainUnit::Db);

    run(
        &files(&["1.flac", "2.flac"]),
        &config(TagMode::Skip, true),
        &analyzer,
        &mut store,
        &mut reporter,
    )
    .unwrap();

    let out = String::from_utf8(reporter.finish().unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "File\tMP3 gain\tdB gain\tMax Amplitude\tMax global_gain\tMin global_gain",
            "1.flac\t0\t-3.00\t16384.000000\t0\t0",
            "2.flac\t0\t-3.00\t8192.000000\t0\t0",
            "Album\t0\t-3.00\t16384.000000\t0\t0",
        ]
    );
}
