//! Matcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the bit-correlation matcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Candidate offset stride in cells.
    /// Only rows and columns that are multiples of this are evaluated.
    #[serde(default = "default_stride")]
    pub stride: usize,

    /// Cell edge length in meters.
    /// Scales the candidate spread into the reported distance.
    #[serde(default = "default_cell_size")]
    pub cell_size_m: f64,

    /// Whether to use parallel search (rayon).
    /// Candidate rows are scored on the rayon pool and reduced with a
    /// tie-collecting accumulator.
    #[serde(default = "default_true")]
    pub use_parallel: bool,
}

fn default_stride() -> usize {
    3
}

fn default_cell_size() -> f64 {
    0.1 // 10cm cells
}

fn default_true() -> bool {
    true
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stride: default_stride(),
            cell_size_m: default_cell_size(),
            use_parallel: default_true(),
        }
    }
}

impl MatcherConfig {
    /// Exhaustive single-threaded search (stride 1).
    ///
    /// Mostly useful for tests and offline evaluation.
    pub fn exhaustive() -> Self {
        Self {
            stride: 1,
            use_parallel: false,
            ..Default::default()
        }
    }
}
