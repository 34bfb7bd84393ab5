//! Region of interest for the correlation search.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Circular search region in grid cells.
///
/// The footprint's anchor (its first trajectory point) must land inside
/// the circle for a placement to be considered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    /// Center cell
    pub center: GridCoord,
    /// Radius in cells
    pub radius: i32,
}

impl Roi {
    /// Create a region.
    pub fn new(center: GridCoord, radius: i32) -> Self {
        Self {
            center,
            radius: radius.max(0),
        }
    }

    /// Whether a cell lies inside the circle (boundary included).
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        let r = self.radius as i64;
        self.center.distance_squared(&coord) <= r * r
    }
}
