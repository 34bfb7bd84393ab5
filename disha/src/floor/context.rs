//! Active floor state.

use super::graph::FloorGraph;
use super::key::FloorKey;
use crate::core::GridCoord;
use crate::grid::OccupancyGrid;

/// Everything the tracker needs about the floor the user is on.
#[derive(Clone, Debug)]
pub struct FloorContext {
    /// Floor id as reported by the caller
    pub floor: i32,
    /// Asset key of the floor
    pub key: FloorKey,
    /// Walkable cells
    pub grid: OccupancyGrid,
    /// Corridor graph
    pub graph: FloorGraph,
    /// Grid origin in the building frame
    pub origin: GridCoord,
}

impl FloorContext {
    /// Grid coordinate to building coordinate.
    #[inline]
    pub fn to_global(&self, grid: GridCoord) -> GridCoord {
        grid + self.origin
    }

    /// Building coordinate to grid coordinate.
    #[inline]
    pub fn to_grid(&self, global: GridCoord) -> GridCoord {
        global - self.origin
    }
}
