//! Test utilities for Disha scenarios.
//!
//! Builders for corridor maps, trackers and step feeds.

#![allow(dead_code)]

use disha::floor::{FloorGraph, FloorKey, InMemoryFloorAssets, LandingZoneTable, OriginTable};
use disha::{
    DishaConfig, GridCoord, MatcherConfig, OccupancyGrid, PositionTracker, StepInput, StepOutput,
};

/// Step length used by most scenarios (7 cells).
pub const STEP: f64 = 0.7;

/// Grid with every cell walkable.
pub fn open_grid(height: usize, width: usize) -> OccupancyGrid {
    corridor_grid(height, width, 0..height, 0..width)
}

/// Grid with a walkable rectangle.
pub fn corridor_grid(
    height: usize,
    width: usize,
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(height, width);
    for x in rows {
        for y in cols.clone() {
            grid.set(x as i32, y as i32, true);
        }
    }
    grid
}

/// Grid with the given cells walkable.
pub fn grid_with_cells(height: usize, width: usize, cells: &[GridCoord]) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(height, width);
    for c in cells {
        grid.set(c.x, c.y, true);
    }
    grid
}

/// Default configuration with an unstrided search.
pub fn exhaustive_config() -> DishaConfig {
    DishaConfig {
        matcher: MatcherConfig {
            stride: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Tracker on floor 1 with a single grid.
pub fn tracker_on(grid: OccupancyGrid, config: DishaConfig) -> PositionTracker {
    let assets =
        InMemoryFloorAssets::new().with_floor(FloorKey::Floor(1), grid, FloorGraph::empty());
    PositionTracker::new(
        config,
        1,
        Box::new(assets),
        LandingZoneTable::new(),
        OriginTable::new(),
    )
    .expect("valid config")
}

/// Tracker with several floors, landings and origins.
pub fn building(
    floors: Vec<(FloorKey, OccupancyGrid)>,
    landing: LandingZoneTable,
    origins: OriginTable,
    config: DishaConfig,
) -> PositionTracker {
    let mut assets = InMemoryFloorAssets::new();
    for (key, grid) in floors {
        assets.insert(key, grid, FloorGraph::empty());
    }
    PositionTracker::new(config, 1, Box::new(assets), landing, origins).expect("valid config")
}

/// Feed `n` steps with a fixed heading and compass on `floor`.
pub fn walk(
    tracker: &mut PositionTracker,
    floor: i32,
    heading: f64,
    compass: f64,
    n: usize,
    counter: &mut u64,
) -> Vec<StepOutput> {
    (0..n)
        .map(|_| {
            *counter += 1;
            tracker
                .process_step(&StepInput::new(floor, heading, compass, STEP, *counter))
                .expect("valid step")
        })
        .collect()
}
