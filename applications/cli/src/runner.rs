//! Run engine
//!
//! Scans every file in input order, then derives gains, reports and writes
//! tags one file at a time. Per-file failures are logged and collected; only
//! invalid options and an Opus/non-Opus album abort the run, and both are
//! detected before any file is written.

use crate::error::Result;
use crate::report::Reporter;
use loudtag_core::{ClipPolicy, RunConfig, ScanResult};
use loudtag_loudness::{Analyzer, ClipCorrector, ResultRegistry};
use loudtag_tags::{plan, TagStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of a run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Results of every successfully scanned file, in input order
    pub results: Vec<ScanResult>,
    /// Files that failed to scan or tag, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl RunSummary {
    /// Whether any file failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn fail(&mut self, path: &Path, reason: String) {
        error!("{}: {}", path.display(), reason);
        self.failed.push((path.to_path_buf(), reason));
    }
}

/// Scan, report and tag `files`
pub fn run<A, S, W>(
    files: &[PathBuf],
    config: &RunConfig,
    analyzer: &A,
    store: &mut S,
    reporter: &mut Reporter<W>,
) -> Result<RunSummary>
where
    A: Analyzer + ?Sized,
    S: TagStore + ?Sized,
    W: Write,
{
    config.validate()?;

    let corrector = ClipCorrector::new(config.max_true_peak_level, config.clip_policy);
    let mut registry = ResultRegistry::new(files.len(), config.reference_loudness, corrector);
    if !config.album {
        registry = registry.discard_programs();
    }
    let mut summary = RunSummary::default();

    for (index, path) in files.iter().enumerate() {
        info!("Scanning {} ({}/{})", path.display(), index + 1, files.len());
        match analyzer.analyze(path) {
            Ok(analysis) => registry.record(index, analysis),
            Err(e) => summary.fail(path, e.to_string()),
        }
    }

    let album = config.album && registry.recorded() > 0;
    if album {
        registry.check_album_mix()?;
        let aggregate = registry.album_aggregate()?;
        if aggregate.has_mixed_containers {
            warn!("You have different file types in the same album!");
        }
        if aggregate.has_mixed_codecs {
            warn!("You have different codecs in the same album!");
        }
        debug!(
            "Album of {} track(s), opus: {}",
            aggregate.track_count, aggregate.has_opus
        );
    }

    reporter.begin()?;
    let mut last_album: Option<ScanResult> = None;

    for (index, path) in files.iter().enumerate() {
        let Some(mut result) = registry.get_track_result(index, config.pre_gain) else {
            continue;
        };
        if album {
            registry.set_album_result(&mut result, config.pre_gain)?;
        }

        if config.clip_policy == ClipPolicy::Warn {
            if result.track_clip.will_clip {
                warn!("{}: The track will clip", path.display());
            }
            if result.album.is_some_and(|a| a.clip.will_clip) {
                warn!("{}: The album will clip", path.display());
            }
        }

        reporter.track(&result)?;

        match plan(&result, config) {
            Ok(Some(update)) => {
                if let Err(e) = store.apply(&update) {
                    summary.fail(path, e.to_string());
                }
            }
            Ok(None) => debug!("{}: tags left untouched", path.display()),
            Err(e) => summary.fail(path, e.to_string()),
        }

        if album {
            last_album = Some(result.clone());
        }
        summary.results.push(result);
    }

    if let Some(result) = last_album {
        reporter.album(&result)?;
    }

    info!(
        "Processed {} file(s), {} failed",
        files.len(),
        summary.failed.len()
    );
    Ok(summary)
}
