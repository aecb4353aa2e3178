//! Per-run result registry
//!
//! Holds one slot per input file, in input order. Failed files leave their
//! slot empty and never count towards the album.
//!
//! Album loudness is measured over the combined program of all recorded
//! tracks (the gating blocks of every track pooled together), which is not
//! the same as averaging per-track LUFS values.

use crate::analyzer::ProgramState;
use crate::clipping::ClipCorrector;
use crate::decoder::Analysis;
use crate::error::{LoudnessError, Result};
use crate::gain::{gain, reference_for};
use loudtag_core::{AlbumResult, Measurement, ScanResult};
use tracing::{debug, warn};

/// Album-wide values derived from every recorded track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlbumAggregate {
    /// Integrated loudness of the combined program in LUFS
    pub loudness: f64,
    /// Loudness range of the combined program in LU
    pub loudness_range: f64,
    /// Maximum track true peak (linear)
    pub peak: f64,
    /// Number of tracks that contributed
    pub track_count: usize,
    /// Tracks come from more than one container family
    pub has_mixed_containers: bool,
    /// Tracks use more than one codec
    pub has_mixed_codecs: bool,
    /// At least one track is Opus
    pub has_opus: bool,
}

/// Stores analyses by input index and derives track and album results
#[derive(Debug)]
pub struct ResultRegistry {
    slots: Vec<Option<Analysis>>,
    reference_loudness: f64,
    corrector: ClipCorrector,
    retain_programs: bool,
    album: Option<AlbumAggregate>,
}

impl ResultRegistry {
    /// Create a registry with one empty slot per expected file
    pub fn new(expected_count: usize, reference_loudness: f64, corrector: ClipCorrector) -> Self {
        let mut slots = Vec::with_capacity(expected_count);
        slots.resize_with(expected_count, || None);
        Self {
            slots,
            reference_loudness,
            corrector,
            retain_programs: true,
            album: None,
        }
    }

    /// Drop the retained gating state of every recorded track
    ///
    /// For track-only runs, where no album loudness is ever measured.
    pub fn discard_programs(mut self) -> Self {
        self.retain_programs = false;
        self
    }

    /// Number of slots holding a measurement
    pub fn recorded(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Store the analysis of file `index`
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn record(&mut self, index: usize, analysis: Analysis) {
        assert!(
            index < self.slots.len(),
            "track index {} out of range (registry holds {})",
            index,
            self.slots.len()
        );
        self.slots[index] = Some(if self.retain_programs {
            analysis
        } else {
            Analysis {
                program: None,
                ..analysis
            }
        });
        self.album = None;
    }

    /// Measurement of file `index`, if it was recorded
    pub fn measurement(&self, index: usize) -> Option<&Measurement> {
        self.slots
            .get(index)
            .and_then(|slot| slot.as_ref())
            .map(|a| &a.measurement)
    }

    fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.slots.iter().flatten().map(|a| &a.measurement)
    }

    /// Track result for file `index`, or `None` if it was never measured
    ///
    /// Opus tracks are computed against -23 LUFS.
    pub fn get_track_result(&self, index: usize, pre_gain: f64) -> Option<ScanResult> {
        let m = self.measurement(index)?;
        let reference = reference_for(m.codec, self.reference_loudness);
        let corrected = self
            .corrector
            .apply(gain(m.integrated_loudness, reference, pre_gain), m.true_peak);

        Some(ScanResult {
            file_path: m.file_path.clone(),
            container: m.container,
            codec: m.codec,
            track_loudness: m.integrated_loudness,
            track_loudness_range: m.loudness_range,
            track_peak: m.true_peak,
            track_gain: corrected.gain,
            reference_loudness: reference,
            track_clip: corrected.clip,
            album: None,
        })
    }

    /// Album aggregate over every recorded track (computed once)
    pub fn album_aggregate(&mut self) -> Result<AlbumAggregate> {
        if let Some(album) = self.album {
            return Ok(album);
        }
        let album = self.compute_album()?;
        self.album = Some(album);
        Ok(album)
    }

    /// Attach album gain, loudness, range and peak to `result`
    pub fn set_album_result(&mut self, result: &mut ScanResult, pre_gain: f64) -> Result<()> {
        let album = self.album_aggregate()?;
        let corrected = self.corrector.apply(
            gain(album.loudness, result.reference_loudness, pre_gain),
            album.peak,
        );

        result.album = Some(AlbumResult {
            gain: corrected.gain,
            loudness: album.loudness,
            loudness_range: album.loudness_range,
            peak: album.peak,
            clip: corrected.clip,
        });
        Ok(())
    }

    /// Recorded tracks come from more than one container family
    pub fn album_has_different_containers(&self) -> bool {
        let mut it = self.measurements().map(|m| m.container);
        match it.next() {
            Some(first) => it.any(|c| c != first),
            None => false,
        }
    }

    /// Recorded tracks use more than one codec
    pub fn album_has_different_codecs(&self) -> bool {
        let mut it = self.measurements().map(|m| m.codec);
        match it.next() {
            Some(first) => it.any(|c| c != first),
            None => false,
        }
    }

    /// At least one recorded track is Opus
    pub fn album_has_opus(&self) -> bool {
        self.measurements().any(|m| m.codec.is_opus())
    }

    /// Fails when Opus and non-Opus tracks are recorded together
    ///
    /// Their reference levels differ, so no single album gain is correct.
    pub fn check_album_mix(&self) -> Result<()> {
        if self.album_has_opus() && self.measurements().any(|m| !m.codec.is_opus()) {
            return Err(LoudnessError::MixedOpusAlbum);
        }
        Ok(())
    }

    fn compute_album(&self) -> Result<AlbumAggregate> {
        let recorded: Vec<&Analysis> = self.slots.iter().flatten().collect();
        if recorded.is_empty() {
            return Err(LoudnessError::EmptyAlbum);
        }

        let peak = recorded
            .iter()
            .map(|a| a.measurement.true_peak)
            .fold(0.0_f64, f64::max);

        let states: Option<Vec<&ProgramState>> =
            recorded.iter().map(|a| a.program.as_ref()).collect();

        let (loudness, loudness_range) = match states {
            Some(states) => (
                ProgramState::combined_loudness(states.iter().copied())?,
                ProgramState::combined_range(states.iter().copied())?,
            ),
            None => {
                warn!("Program state missing for some tracks, approximating album loudness");
                approximate_album(&recorded)
            }
        };

        let album = AlbumAggregate {
            loudness,
            loudness_range,
            peak,
            track_count: recorded.len(),
            has_mixed_containers: self.album_has_different_containers(),
            has_mixed_codecs: self.album_has_different_codecs(),
            has_opus: self.album_has_opus(),
        };
        debug!("Album aggregate: {:?}", album);
        Ok(album)
    }
}

/// Duration-weighted energy mean of track loudness, and the widest track range
fn approximate_album(tracks: &[&Analysis]) -> (f64, f64) {
    let total_duration: f64 = tracks.iter().map(|a| a.measurement.duration_secs).sum();

    let mut total_power = 0.0_f64;
    for track in tracks {
        let m = &track.measurement;
        let weight = if total_duration > 0.0 {
            m.duration_secs / total_duration
        } else {
            1.0 / tracks.len() as f64
        };
        total_power += 10.0_f64.powf(m.integrated_loudness / 10.0) * weight;
    }

    let range = tracks
        .iter()
        .map(|a| a.measurement.loudness_range)
        .fold(0.0_f64, f64::max);

    (10.0 * total_power.log10(), range)
}
