//! Traits for trajectory matching algorithms.

use crate::core::GridCoord;
use crate::grid::OccupancyGrid;

use super::{MatchResult, Roi};

/// Trait for trajectory-to-map matching algorithms.
///
/// The hypothesis evaluator scores every hypothesis through this trait, so
/// alternative matchers can be dropped in without touching calibration.
pub trait TrajectoryMatcher: Send + Sync {
    /// Match trajectory points against a floor grid.
    ///
    /// # Arguments
    /// * `points` - Trajectory in grid cells, oldest first
    /// * `grid` - Floor occupancy grid
    /// * `roi` - Optional region the trajectory start must land in
    fn match_trajectory(
        &self,
        points: &[GridCoord],
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> MatchResult;

    /// Get the name of this matcher for logging/debugging
    fn name(&self) -> &str;
}
