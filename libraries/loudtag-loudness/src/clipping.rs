//! True peak clipping prediction and correction
//!
//! A gain clips when the true peak after applying it would exceed the
//! ceiling (`max_true_peak_level` dBTP). With the `Correct` policy the gain is
//! lowered just enough to land the peak on the ceiling.
//!
//! # Example
//!
//! ```
//! use loudtag_core::ClipPolicy;
//! use loudtag_loudness::ClipCorrector;
//!
//! let corrector = ClipCorrector::new(-1.0, ClipPolicy::Correct);
//! let corrected = corrector.apply(3.0, 0.9);
//! assert!(corrected.clip.clipped);
//! assert!((corrected.gain - (-0.0849)).abs() < 1e-3);
//! ```

use crate::gain::{db_to_linear, linear_to_db};
use crate::DEFAULT_MAX_TRUE_PEAK_DBTP;
use loudtag_core::{ClipPolicy, ClipState};

/// Gain after clipping handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Resulting gain in dB
    pub gain: f64,
    /// Clipping state for reporting
    pub clip: ClipState,
}

/// Applies the clipping policy to gain/peak pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipCorrector {
    max_true_peak_dbtp: f64,
    policy: ClipPolicy,
}

impl Default for ClipCorrector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRUE_PEAK_DBTP, ClipPolicy::Warn)
    }
}

impl ClipCorrector {
    /// Create a corrector for a ceiling in dBTP
    pub fn new(max_true_peak_dbtp: f64, policy: ClipPolicy) -> Self {
        Self {
            max_true_peak_dbtp,
            policy,
        }
    }

    /// Predict clipping for `gain_db` applied to a linear `peak`
    ///
    /// Exactly reaching the ceiling is not clipping.
    pub fn will_clip(&self, gain_db: f64, peak: f64) -> bool {
        db_to_linear(gain_db) * peak > db_to_linear(self.max_true_peak_dbtp)
    }

    /// Apply the policy
    ///
    /// Only `ClipPolicy::Correct` changes the gain. Applying the result again
    /// leaves it unchanged.
    pub fn apply(&self, gain_db: f64, peak: f64) -> Correction {
        let limit = db_to_linear(self.max_true_peak_dbtp);
        let gained_peak = db_to_linear(gain_db) * peak;
        let will_clip = gained_peak > limit;

        if will_clip && self.policy == ClipPolicy::Correct {
            let new_peak = gained_peak.min(limit);
            return Correction {
                gain: gain_db - linear_to_db(gained_peak / new_peak),
                clip: ClipState {
                    will_clip: false,
                    clipped: true,
                },
            };
        }

        Correction {
            gain: gain_db,
            clip: ClipState {
                will_clip,
                clipped: false,
            },
        }
    }
}
