//! Heading calibration configuration.

use serde::{Deserialize, Serialize};

/// Configuration for coarse lock, hypothesis search and fine tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Spacing between coarse candidate offsets (degrees).
    /// 45° gives the eight candidates 0, 45, ..., 315.
    #[serde(default = "default_candidate_spacing")]
    pub candidate_spacing_deg: f64,

    /// Maximum change of the winner's compass difference between two steps
    /// for the step to count as stable (degrees).
    #[serde(default = "default_stability_threshold")]
    pub stability_threshold_deg: f64,

    /// Number of stable winners kept for the lock vote.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Votes one candidate needs inside the window to lock.
    #[serde(default = "default_lock_votes")]
    pub lock_votes: usize,

    /// Spacing of the nine hypotheses around the coarse lock (degrees).
    #[serde(default = "default_hypothesis_spacing")]
    pub locked_spacing_deg: f64,

    /// Spacing of the nine hypotheses once fine tuning starts (degrees).
    #[serde(default = "default_hypothesis_spacing")]
    pub fine_spacing_deg: f64,

    /// A hypothesis whose match rate is at or below this is dropped for
    /// the rest of the epoch.
    #[serde(default = "default_deactivation_rate")]
    pub deactivation_rate: f64,

    /// Consecutive wins needed before fine tuning starts.
    #[serde(default = "default_fine_tune_streak")]
    pub fine_tune_streak: u32,

    /// Consecutive wins in fine tuning before the search collapses.
    #[serde(default = "default_fine_lock_streak")]
    pub fine_lock_streak: u32,

    /// Minimum match-rate lead of the best over the second best hypothesis
    /// for fine tuning to start.
    #[serde(default = "default_min_rate_gap")]
    pub min_rate_gap: f64,

    /// Building north relative to magnetic north (degrees).
    /// The compass reading is rotated by this before the coarse comparison.
    #[serde(default)]
    pub compass_north_offset_deg: f64,
}

fn default_candidate_spacing() -> f64 {
    45.0
}

fn default_stability_threshold() -> f64 {
    20.0
}

fn default_history_window() -> usize {
    10
}

fn default_lock_votes() -> usize {
    9
}

fn default_hypothesis_spacing() -> f64 {
    5.0
}

fn default_deactivation_rate() -> f64 {
    0.8
}

fn default_fine_tune_streak() -> u32 {
    40
}

fn default_fine_lock_streak() -> u32 {
    5
}

fn default_min_rate_gap() -> f64 {
    0.01
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            candidate_spacing_deg: default_candidate_spacing(),
            stability_threshold_deg: default_stability_threshold(),
            history_window: default_history_window(),
            lock_votes: default_lock_votes(),
            locked_spacing_deg: default_hypothesis_spacing(),
            fine_spacing_deg: default_hypothesis_spacing(),
            deactivation_rate: default_deactivation_rate(),
            fine_tune_streak: default_fine_tune_streak(),
            fine_lock_streak: default_fine_lock_streak(),
            min_rate_gap: default_min_rate_gap(),
            compass_north_offset_deg: 0.0,
        }
    }
}

impl CalibrationConfig {
    /// Coarse candidate offsets in degrees.
    pub fn candidates(&self) -> Vec<f64> {
        let count = (360.0 / self.candidate_spacing_deg).round().max(1.0) as usize;
        (0..count)
            .map(|i| i as f64 * self.candidate_spacing_deg)
            .collect()
    }
}
