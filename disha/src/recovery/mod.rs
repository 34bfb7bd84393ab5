//! Drift recovery and search hints.
//!
//! Watches the best hypothesis each step. A long trajectory that matches the
//! floor poorly means the estimate has drifted; the controller then asks for
//! a re-search that starts a new epoch, optionally around a known centre.
//!
//! # Search Hints
//!
//! ```text
//!              floor change                     re-search
//!   ┌──────┐ ─────────────▶ ┌──────────┐ ─────────────────▶ ┌──────────┐
//!   │ None │                │ NewFloor │                    │ Research │
//!   └──────┘ ◀───────────── └──────────┘ ◀───────────────── └──────────┘
//!       ▲     session reset                 floor change         │
//!       └────────────────────────────────────────────────────────┘
//!                              session reset
//! ```
//!
//! A hint restricts where the epoch's first trajectory point may land. It
//! holds for the whole epoch and is replaced, never merged.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;
use crate::matching::{MatchResult, Roi};

/// Recovery thresholds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Trajectory length (points) above which recovery may trigger.
    #[serde(default = "default_min_trajectory_len")]
    pub min_trajectory_len: usize,

    /// Match rate below which recovery triggers.
    #[serde(default = "default_min_match_rate")]
    pub min_match_rate: f64,

    /// ROI radius of a drift re-search (cells).
    #[serde(default = "default_research_radius")]
    pub research_radius: i32,

    /// History is only reset while the estimate spread is below this (m).
    #[serde(default = "default_max_spread")]
    pub max_spread_m: f64,

    /// ROI radius of a re-search at a known stairwell (cells).
    #[serde(default = "default_stairs_research_radius")]
    pub stairs_research_radius: i32,
}

fn default_min_trajectory_len() -> usize {
    30
}

fn default_min_match_rate() -> f64 {
    0.9
}

fn default_research_radius() -> i32 {
    100
}

fn default_max_spread() -> f64 {
    10.0
}

fn default_stairs_research_radius() -> i32 {
    2
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            min_trajectory_len: default_min_trajectory_len(),
            min_match_rate: default_min_match_rate(),
            research_radius: default_research_radius(),
            max_spread_m: default_max_spread(),
            stairs_research_radius: default_stairs_research_radius(),
        }
    }
}

/// Where the next matches should look.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchHint {
    /// Whole grid
    #[default]
    None,
    /// Around the arrival coordinate after a floor change
    NewFloor {
        /// Arrival coordinate (grid frame)
        center: GridCoord,
    },
    /// Around a re-search centre
    Research {
        /// Centre (grid frame)
        center: GridCoord,
        /// Radius in cells
        radius: i32,
    },
}

impl SearchHint {
    /// Centre of the hint, if any.
    pub fn center(&self) -> Option<GridCoord> {
        match *self {
            SearchHint::None => None,
            SearchHint::NewFloor { center } | SearchHint::Research { center, .. } => Some(center),
        }
    }
}

/// What the tracker should do after a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecoveryAction {
    /// Keep going
    Continue,
    /// Start a re-search around `center` (or the current estimate)
    Research {
        /// Re-search centre (grid frame)
        center: Option<GridCoord>,
        /// ROI radius in cells
        radius: i32,
    },
}

/// Decides when to re-search and owns the active search hint.
#[derive(Clone, Debug)]
pub struct RecoveryController {
    config: RecoveryConfig,
    new_floor_radius: i32,
    hint: SearchHint,
}

impl RecoveryController {
    /// Create a controller. `new_floor_radius` is the ROI radius used after
    /// a floor change.
    pub fn new(config: RecoveryConfig, new_floor_radius: i32) -> Self {
        Self {
            config,
            new_floor_radius,
            hint: SearchHint::None,
        }
    }

    /// Get configuration.
    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Active hint.
    pub fn hint(&self) -> SearchHint {
        self.hint
    }

    /// ROI the matcher should use for the current epoch.
    pub fn roi(&self) -> Option<Roi> {
        match self.hint {
            SearchHint::None => None,
            SearchHint::NewFloor { center } => Some(Roi::new(center, self.new_floor_radius)),
            SearchHint::Research { center, radius } => Some(Roi::new(center, radius)),
        }
    }

    /// Whether the best match indicates drift.
    ///
    /// Needs an attempted match (similarity above -1), more than
    /// `min_trajectory_len` points and a rate below `min_match_rate`.
    pub fn should_trigger(&self, best: &MatchResult) -> bool {
        best.similarity > -1
            && best.point_count > self.config.min_trajectory_len
            && best.match_rate() < self.config.min_match_rate
    }

    /// Decide the action for this step's best match.
    pub fn evaluate(&self, best: &MatchResult) -> RecoveryAction {
        if !self.should_trigger(best) {
            return RecoveryAction::Continue;
        }
        log::warn!(
            "Recovery: match rate {:.3} over {} points, re-searching",
            best.match_rate(),
            best.point_count
        );
        RecoveryAction::Research {
            center: best.position,
            radius: self.config.research_radius,
        }
    }

    /// Whether an estimate with this spread allows a history reset.
    ///
    /// Without a known spread the reset is allowed.
    pub fn allows_reset(&self, spread: Option<f64>) -> bool {
        spread.is_none_or(|d| d < self.config.max_spread_m)
    }

    /// Enter new-floor mode around `arrival`.
    pub fn enter_new_floor(&mut self, arrival: GridCoord) {
        self.hint = SearchHint::NewFloor { center: arrival };
        log::debug!(
            "Recovery: new-floor ROI at {:?} radius {}",
            arrival,
            self.new_floor_radius
        );
    }

    /// Re-centre the search.
    pub fn research(&mut self, center: GridCoord, radius: i32) {
        self.hint = SearchHint::Research { center, radius };
        log::debug!("Recovery: re-search ROI at {:?} radius {}", center, radius);
    }

    /// Drop any hint.
    pub fn clear(&mut self) {
        self.hint = SearchHint::None;
    }
}
