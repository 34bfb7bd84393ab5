//! Floor transition configuration.

use serde::{Deserialize, Serialize};

/// Floor change settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorConfig {
    /// ROI radius around the arrival coordinate after a floor change (cells).
    #[serde(default = "default_new_floor_roi_radius")]
    pub new_floor_roi_radius: i32,

    /// Floors at or above this share the `basic` assets and landing zones.
    #[serde(default = "default_shared_floor_from")]
    pub shared_floor_from: Option<i32>,
}

fn default_new_floor_roi_radius() -> i32 {
    50
}

fn default_shared_floor_from() -> Option<i32> {
    Some(4)
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            new_floor_roi_radius: default_new_floor_roi_radius(),
            shared_floor_from: default_shared_floor_from(),
        }
    }
}
