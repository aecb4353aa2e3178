//! Result output on stdout
//!
//! Two layouts: a human-readable block per track (and one for the album),
//! and a tab-delimited list compatible with mp3gain's database output.

use loudtag_core::{GainUnit, ScanResult};
use std::io::{self, Write};

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable blocks
    #[default]
    Human,
    /// Tab-delimited list
    Tab,
}

/// Writes scan results
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
    unit: GainUnit,
}

const CORRECTED: &str = " (corrected to prevent clipping)";

/// mp3gain's full-scale factor for the max amplitude column
const MP3GAIN_FULL_SCALE: f64 = 32768.0;

impl<W: Write> Reporter<W> {
    /// Create a reporter; `unit` labels gains and ranges
    pub fn new(out: W, format: OutputFormat, unit: GainUnit) -> Self {
        Self { out, format, unit }
    }

    /// Column header (tab layout only)
    pub fn begin(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Tab {
            writeln!(
                self.out,
                "File\tMP3 gain\tdB gain\tMax Amplitude\tMax global_gain\tMin global_gain"
            )?;
        }
        Ok(())
    }

    /// Track values
    pub fn track(&mut self, result: &ScanResult) -> io::Result<()> {
        let file = result.file_path.display();
        match self.format {
            OutputFormat::Tab => writeln!(
                self.out,
                "{}\t0\t{:.2}\t{:.6}\t0\t0",
                file,
                result.track_gain,
                result.track_peak * MP3GAIN_FULL_SCALE
            ),
            OutputFormat::Human => {
                let unit = self.unit;
                writeln!(self.out, "\nTrack: {}", file)?;
                writeln!(self.out, " Loudness: {:8.2} LUFS", result.track_loudness)?;
                writeln!(self.out, " Range:    {:8.2} {}", result.track_loudness_range, unit)?;
                writeln!(
                    self.out,
                    " Gain:     {:8.2} {}{}",
                    result.track_gain,
                    unit,
                    if result.track_clip.clipped { CORRECTED } else { "" }
                )?;
                writeln!(
                    self.out,
                    " Peak:     {:8.6} ({:.2} dBTP)",
                    result.track_peak,
                    result.track_peak_dbtp()
                )
            }
        }
    }

    /// Album values carried by `result`; nothing if it has none
    pub fn album(&mut self, result: &ScanResult) -> io::Result<()> {
        let Some(album) = result.album else {
            return Ok(());
        };
        match self.format {
            OutputFormat::Tab => writeln!(
                self.out,
                "Album\t0\t{:.2}\t{:.6}\t0\t0",
                album.gain,
                album.peak * MP3GAIN_FULL_SCALE
            ),
            OutputFormat::Human => {
                let unit = self.unit;
                writeln!(self.out, "\nAlbum:")?;
                writeln!(self.out, " Loudness: {:8.2} LUFS", album.loudness)?;
                writeln!(self.out, " Range:    {:8.2} {}", album.loudness_range, unit)?;
                writeln!(
                    self.out,
                    " Gain:     {:8.2} {}{}",
                    album.gain,
                    unit,
                    if album.clip.clipped { CORRECTED } else { "" }
                )?;
                writeln!(
                    self.out,
                    " Peak:     {:8.6} ({:.2} dBTP)",
                    album.peak,
                    result.album_peak_dbtp().unwrap_or(f64::NEG_INFINITY)
                )
            }
        }
    }

    /// Flush and return the writer
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
