//! Output configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-step output settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Distances above this are reported as a failed step
    #[serde(default = "defaults::max_valid_distance")]
    pub max_valid_distance: f64,

    /// Also report the position snapped onto the floor graph
    #[serde(default)]
    pub snap_to_graph: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_valid_distance: defaults::max_valid_distance(),
            snap_to_graph: false,
        }
    }
}
