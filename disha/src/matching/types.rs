//! Match result types.

use crate::core::GridCoord;

/// Distance value reported when there is no usable match.
pub const INVALID_DISTANCE: f64 = 99_999.0;

/// Result of correlating one trajectory against a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Best popcount over all placements, -1 when no placement was viable.
    pub similarity: i32,
    /// Every placement offset that reached `similarity`, sorted.
    pub offsets: Vec<GridCoord>,
    /// Centroid of the tied placements' end points, in grid coordinates.
    /// `None` unless `similarity > 0`.
    pub position: Option<GridCoord>,
    /// Mean deviation of the tied end points from their centroid (meters).
    /// [`INVALID_DISTANCE`] on failure.
    pub distance: f64,
    /// Trajectory length in points.
    pub point_count: usize,
}

impl MatchResult {
    /// A failed match.
    pub fn failed(similarity: i32, point_count: usize) -> Self {
        Self {
            similarity: similarity.min(0),
            offsets: Vec::new(),
            position: None,
            distance: INVALID_DISTANCE,
            point_count,
        }
    }

    /// Whether the result carries a usable position.
    #[inline]
    pub fn is_match(&self) -> bool {
        self.similarity > 0 && self.position.is_some()
    }

    /// Best similarity divided by trajectory length (0 for empty trajectories).
    #[inline]
    pub fn match_rate(&self) -> f64 {
        if self.point_count == 0 {
            0.0
        } else {
            self.similarity.max(0) as f64 / self.point_count as f64
        }
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::failed(-1, 0)
    }
}
