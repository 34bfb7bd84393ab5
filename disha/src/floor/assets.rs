//! Floor asset collaborator.

use std::collections::HashMap;

use super::graph::FloorGraph;
use super::key::FloorKey;
use crate::grid::OccupancyGrid;

/// Supplies already-parsed floor assets.
///
/// Implementations may block; they are only called on floor changes.
/// `None` means the asset is unavailable and the floor is treated as empty.
pub trait FloorAssetSource {
    /// Occupancy grid of `key`.
    fn occupancy_grid(&self, key: FloorKey) -> Option<OccupancyGrid>;

    /// Node/edge graph of `key`.
    fn floor_graph(&self, key: FloorKey) -> Option<FloorGraph>;
}

/// Asset source backed by maps held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFloorAssets {
    grids: HashMap<FloorKey, OccupancyGrid>,
    graphs: HashMap<FloorKey, FloorGraph>,
}

impl InMemoryFloorAssets {
    /// Source with no floors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a floor's grid and graph.
    pub fn with_floor(mut self, key: FloorKey, grid: OccupancyGrid, graph: FloorGraph) -> Self {
        self.insert(key, grid, graph);
        self
    }

    /// Register a floor's grid and graph.
    pub fn insert(&mut self, key: FloorKey, grid: OccupancyGrid, graph: FloorGraph) {
        self.grids.insert(key, grid);
        self.graphs.insert(key, graph);
    }
}

impl FloorAssetSource for InMemoryFloorAssets {
    fn occupancy_grid(&self, key: FloorKey) -> Option<OccupancyGrid> {
        self.grids.get(&key).cloned()
    }

    fn floor_graph(&self, key: FloorKey) -> Option<FloorGraph> {
        self.graphs.get(&key).cloned()
    }
}
