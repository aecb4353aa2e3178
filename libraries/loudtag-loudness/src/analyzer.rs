//! EBU R128 loudness analysis
//!
//! Wraps the ebur128 crate. The analyzer state is retained after
//! finalization as a [`ProgramState`] so that several tracks can later be
//! measured as one combined program (album loudness).

use crate::error::{LoudnessError, Result};
use ebur128::{Channel, EbuR128, Mode};
use std::fmt;

/// Loudness characteristics of one analyzed program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramLoudness {
    /// Integrated loudness in LUFS
    pub integrated_lufs: f64,

    /// Loudness range in LU
    pub loudness_range_lu: f64,

    /// Maximum true peak across channels (linear, 1.0 = 0 dBTP)
    /// Uses 4x oversampling for sample rates < 96kHz as per ITU-R BS.1770
    pub true_peak: f64,

    /// Duration of the analyzed audio in seconds
    pub duration_seconds: f64,
}

impl fmt::Display for ProgramLoudness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loudness: {:.1} LUFS, Range: {:.1} LU, True Peak: {:.6}",
            self.integrated_lufs, self.loudness_range_lu, self.true_peak
        )
    }
}

/// Gating state of a finished analysis, kept for album measurement
pub struct ProgramState {
    ebur128: EbuR128,
}

impl ProgramState {
    /// Integrated loudness of several programs measured as one
    pub fn combined_loudness<'a>(
        states: impl IntoIterator<Item = &'a ProgramState>,
    ) -> Result<f64> {
        let loudness = EbuR128::loudness_global_multiple(states.into_iter().map(|s| &s.ebur128))?;
        Ok(loudness)
    }

    /// Loudness range of several programs measured as one
    pub fn combined_range<'a>(states: impl IntoIterator<Item = &'a ProgramState>) -> Result<f64> {
        let range = EbuR128::loudness_range_multiple(states.into_iter().map(|s| &s.ebur128))?;
        Ok(range)
    }
}

impl fmt::Debug for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramState")
            .field("channels", &self.ebur128.channels())
            .field("rate", &self.ebur128.rate())
            .finish()
    }
}

/// EBU R128 loudness analyzer
///
/// Analyzes audio samples to measure loudness according to EBU R128 / ITU-R BS.1770.
///
/// # Example
///
/// ```ignore
/// use loudtag_loudness::LoudnessAnalyzer;
///
/// let mut analyzer = LoudnessAnalyzer::new(44100, 2)?;
/// analyzer.add_frames(&audio_samples)?;
///
/// let (info, _state) = analyzer.finalize()?;
/// println!("Integrated loudness: {:.1} LUFS", info.integrated_lufs);
/// ```
pub struct LoudnessAnalyzer {
    ebur128: EbuR128,
    sample_rate: u32,
    channels: u32,
    samples_processed: usize,
}

impl LoudnessAnalyzer {
    /// Create a new loudness analyzer
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz (8000-384000)
    /// * `channels` - Number of channels (1-8)
    pub fn new(sample_rate: u32, channels: u32) -> Result<Self> {
        if !(8000..=384000).contains(&sample_rate) {
            return Err(LoudnessError::InvalidSampleRate(sample_rate));
        }
        if !(1..=8).contains(&channels) {
            return Err(LoudnessError::InvalidChannelCount(channels));
        }

        let mode = Mode::I | Mode::LRA | Mode::TRUE_PEAK;
        let ebur128 = EbuR128::new(channels, sample_rate, mode)?;

        Ok(Self {
            ebur128,
            sample_rate,
            channels,
            samples_processed: 0,
        })
    }

    /// Assign a loudness weighting role to each channel (LFE must be `Unused`)
    pub fn set_channel_map(&mut self, map: &[Channel]) -> Result<()> {
        if map.len() != self.channels as usize {
            return Err(LoudnessError::AnalysisError(format!(
                "Channel map has {} entries for {} channels",
                map.len(),
                self.channels
            )));
        }
        self.ebur128.set_channel_map(map)?;
        Ok(())
    }

    /// Add interleaved f32 frames
    ///
    /// Length must be divisible by the channel count.
    pub fn add_frames(&mut self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        if samples.len() % self.channels as usize != 0 {
            return Err(LoudnessError::AnalysisError(format!(
                "Sample count {} is not divisible by channel count {}",
                samples.len(),
                self.channels
            )));
        }

        self.ebur128.add_frames_f32(samples)?;
        self.samples_processed += samples.len();

        Ok(())
    }

    /// Finalize analysis
    ///
    /// Returns the measured values together with the retained gating state.
    ///
    /// # Errors
    /// Returns error if no samples were provided or audio is completely silent
    pub fn finalize(self) -> Result<(ProgramLoudness, ProgramState)> {
        if self.samples_processed == 0 {
            return Err(LoudnessError::NoSamples);
        }

        let frames = self.samples_processed / self.channels as usize;
        let duration_seconds = frames as f64 / self.sample_rate as f64;

        let integrated_lufs = self.ebur128.loudness_global()?;
        if integrated_lufs.is_infinite() || integrated_lufs.is_nan() {
            return Err(LoudnessError::SilentAudio);
        }

        let loudness_range_lu = self.ebur128.loudness_range().unwrap_or(0.0);

        let mut true_peak = 0.0_f64;
        for ch in 0..self.channels {
            true_peak = true_peak.max(self.ebur128.true_peak(ch).unwrap_or(0.0));
        }

        let info = ProgramLoudness {
            integrated_lufs,
            loudness_range_lu,
            true_peak,
            duration_seconds,
        };

        Ok((info, ProgramState { ebur128: self.ebur128 }))
    }
}
