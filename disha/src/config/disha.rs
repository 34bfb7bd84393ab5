//! Main DishaConfig with loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationConfig;
use crate::error::{DishaError, Result};
use crate::floor::FloorConfig;
use crate::matching::MatcherConfig;
use crate::recovery::RecoveryConfig;
use crate::trajectory::TrajectoryConfig;

use super::defaults;
use super::output::OutputConfig;

/// Full tracker configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DishaConfig {
    /// Correlation search
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Dead-reckoning integration
    #[serde(default)]
    pub trajectory: TrajectoryConfig,

    /// Coarse lock and hypothesis search
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Floor changes
    #[serde(default)]
    pub floor: FloorConfig,

    /// Drift recovery
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Per-step output
    #[serde(default)]
    pub output: OutputConfig,
}

impl DishaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/disha.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Path::new(defaults::config_path());
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the tracker cannot run with.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(DishaError::Config(msg.to_string()));

        if self.matcher.stride == 0 {
            return fail("matcher.stride must be at least 1");
        }
        if !(self.matcher.cell_size_m > 0.0) {
            return fail("matcher.cell_size_m must be positive");
        }
        if !(self.trajectory.cells_per_meter > 0.0) {
            return fail("trajectory.cells_per_meter must be positive");
        }

        let cal = &self.calibration;
        if !(cal.candidate_spacing_deg > 0.0 && cal.candidate_spacing_deg <= 360.0) {
            return fail("calibration.candidate_spacing_deg must be in (0, 360]");
        }
        if cal.history_window == 0 {
            return fail("calibration.history_window must be at least 1");
        }
        if cal.lock_votes == 0 || cal.lock_votes > cal.history_window {
            return fail("calibration.lock_votes must be in 1..=history_window");
        }
        if !(cal.locked_spacing_deg > 0.0) || !(cal.fine_spacing_deg > 0.0) {
            return fail("calibration hypothesis spacing must be positive");
        }
        if !(0.0..=1.0).contains(&cal.deactivation_rate) {
            return fail("calibration.deactivation_rate must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&cal.min_rate_gap) {
            return fail("calibration.min_rate_gap must be in [0, 1]");
        }

        if self.floor.new_floor_roi_radius < 0 {
            return fail("floor.new_floor_roi_radius must not be negative");
        }

        let rec = &self.recovery;
        if !(0.0..=1.0).contains(&rec.min_match_rate) {
            return fail("recovery.min_match_rate must be in [0, 1]");
        }
        if rec.research_radius < 0 || rec.stairs_research_radius < 0 {
            return fail("recovery radii must not be negative");
        }
        if !(rec.max_spread_m > 0.0) {
            return fail("recovery.max_spread_m must be positive");
        }

        if !(self.output.max_valid_distance > 0.0) {
            return fail("output.max_valid_distance must be positive");
        }
        Ok(())
    }
}
