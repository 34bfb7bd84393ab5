//! Floor change detection and context swap.

use super::assets::FloorAssetSource;
use super::config::FloorConfig;
use super::context::FloorContext;
use super::graph::FloorGraph;
use super::key::FloorKey;
use super::landing::{Direction, LandingZoneTable};
use super::origin::OriginTable;
use crate::core::{GridCoord, StepInput};
use crate::grid::OccupancyGrid;

/// Outcome of a floor change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorArrival {
    /// Departed floor
    pub from: i32,
    /// New floor
    pub to: i32,
    /// Arrival coordinate in the new floor's grid frame
    pub position: GridCoord,
    /// Landing coordinate in the building frame, if one resolved
    pub landing: Option<GridCoord>,
}

/// Owns the active floor and swaps it when the reported floor changes.
pub struct FloorTransitionManager {
    config: FloorConfig,
    assets: Box<dyn FloorAssetSource + Send + Sync>,
    landing: LandingZoneTable,
    origins: OriginTable,
    active: FloorContext,
}

impl FloorTransitionManager {
    /// Create a manager with `initial_floor` loaded.
    pub fn new(
        config: FloorConfig,
        initial_floor: i32,
        assets: Box<dyn FloorAssetSource + Send + Sync>,
        landing: LandingZoneTable,
        origins: OriginTable,
    ) -> Self {
        let active = load_context(&config, assets.as_ref(), &origins, initial_floor);
        Self {
            config,
            assets,
            landing,
            origins,
            active,
        }
    }

    /// Get configuration.
    pub fn config(&self) -> &FloorConfig {
        &self.config
    }

    /// The floor the user is on.
    pub fn active(&self) -> &FloorContext {
        &self.active
    }

    /// Whether `floor` differs from the active floor.
    #[inline]
    pub fn detect(&self, floor: i32) -> bool {
        floor != self.active.floor
    }

    /// Handle a step reporting a new floor.
    ///
    /// Resolves the landing from the departed floor, loads the new floor and
    /// converts the landing into its grid frame. Without a landing the user
    /// is placed at the grid origin.
    pub fn transition(
        &mut self,
        input: &StepInput,
        last_global: Option<GridCoord>,
    ) -> FloorArrival {
        let from = self.active.floor;
        let to = input.floor;
        let from_key = FloorKey::of(from, self.config.shared_floor_from);
        let direction = Direction::between(from, to);

        let landing = self.landing.resolve(
            from_key,
            direction,
            input.arrival_heading,
            input.elevation_mode,
            last_global,
        );

        self.active = self.load(to);
        let position = match landing {
            Some(global) => self.active.to_grid(global),
            None => {
                log::warn!(
                    "Floor: no landing for {} {:?} heading {:.0} ({:?}), using grid origin",
                    from_key,
                    direction,
                    input.arrival_heading,
                    input.elevation_mode
                );
                GridCoord::ZERO
            }
        };

        log::info!(
            "Floor: {} -> {} via {:?}, arrival {:?}",
            from,
            to,
            input.elevation_mode,
            position
        );
        FloorArrival {
            from,
            to,
            position,
            landing,
        }
    }

    /// Swap to `floor` unconditionally, arriving at `arrival` (grid frame)
    /// or the grid origin.
    pub fn force(&mut self, floor: i32, arrival: Option<GridCoord>) -> FloorArrival {
        let from = self.active.floor;
        self.active = self.load(floor);
        let position = arrival.unwrap_or(GridCoord::ZERO);
        log::info!("Floor: forced {} -> {}, arrival {:?}", from, floor, position);
        FloorArrival {
            from,
            to: floor,
            position,
            landing: None,
        }
    }

    fn load(&self, floor: i32) -> FloorContext {
        load_context(&self.config, self.assets.as_ref(), &self.origins, floor)
    }
}

fn load_context(
    config: &FloorConfig,
    assets: &(dyn FloorAssetSource + Send + Sync),
    origins: &OriginTable,
    floor: i32,
) -> FloorContext {
    let key = FloorKey::of(floor, config.shared_floor_from);
    let grid = assets.occupancy_grid(key).unwrap_or_else(|| {
        log::warn!("Floor: no occupancy grid for {}, matching disabled", key);
        OccupancyGrid::empty()
    });
    let graph = assets.floor_graph(key).unwrap_or_else(|| {
        log::warn!("Floor: no graph for {}", key);
        FloorGraph::empty()
    });
    FloorContext {
        floor,
        key,
        grid,
        graph,
        origin: origins.origin(key),
    }
}
