//! Dead-reckoning trajectory integration.
//!
//! Turns (heading, step length) pairs into grid-cell trajectory points for
//! one heading hypothesis. Headings are compass-like:
//!
//! ```text
//! dx = -sin(heading) * step_length * cells_per_meter
//! dy =  cos(heading) * step_length * cells_per_meter
//! ```
//!
//! Every step appends its interpolated intermediate points and the new
//! position to the hypothesis trajectory. Points are never removed here;
//! only an epoch reset clears a trajectory.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Trajectory integration settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Grid cells per meter of walked distance.
    #[serde(default = "default_cells_per_meter")]
    pub cells_per_meter: f64,

    /// Subdivide each step into `round(step_length * cells_per_meter)`
    /// points instead of appending only the end point.
    ///
    /// Off by default: one point per step keeps the match rate
    /// (similarity / trajectory length) on the scale the deactivation and
    /// recovery thresholds are tuned for.
    #[serde(default)]
    pub subdivide_by_length: bool,
}

fn default_cells_per_meter() -> f64 {
    10.0 // 0.1m cells
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            cells_per_meter: default_cells_per_meter(),
            subdivide_by_length: false,
        }
    }
}

/// Integrates steps into a trajectory.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryBuilder {
    config: TrajectoryConfig,
}

impl TrajectoryBuilder {
    /// Create a builder.
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    /// Get configuration.
    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Number of points one step appends.
    #[inline]
    pub fn divisions(&self, step_length: f64) -> usize {
        if self.config.subdivide_by_length {
            ((step_length * self.config.cells_per_meter).round() as usize).max(1)
        } else {
            1
        }
    }

    /// Advance `position` by one step and append the interpolated points.
    ///
    /// `heading` is the already offset-corrected heading in degrees.
    pub fn step(
        &self,
        position: &mut GridCoord,
        trajectory: &mut Vec<GridCoord>,
        heading: f64,
        step_length: f64,
    ) {
        let rad = heading.to_radians();
        let scale = step_length * self.config.cells_per_meter;
        let start_x = position.x as f64;
        let start_y = position.y as f64;
        let end_x = start_x - rad.sin() * scale;
        let end_y = start_y + rad.cos() * scale;

        let divisions = self.divisions(step_length);
        trajectory.reserve(divisions);
        for i in 1..=divisions {
            let t = i as f64 / divisions as f64;
            trajectory.push(GridCoord::new(
                (start_x + (end_x - start_x) * t).round() as i32,
                (start_y + (end_y - start_y) * t).round() as i32,
            ));
        }

        *position = GridCoord::new(end_x.round() as i32, end_y.round() as i32);
    }

    /// Replay buffered steps from `origin` with a fixed heading offset.
    ///
    /// Returns the new trajectory and the final position.
    pub fn replay(
        &self,
        origin: GridCoord,
        steps: &[(f64, f64)],
        heading_offset: f64,
    ) -> (Vec<GridCoord>, GridCoord) {
        let mut position = origin;
        let mut trajectory = Vec::with_capacity(steps.len());
        for &(heading, step_length) in steps {
            self.step(&mut position, &mut trajectory, heading + heading_offset, step_length);
        }
        (trajectory, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_zero_walks_positive_y() {
        let builder = TrajectoryBuilder::default();
        let mut pos = GridCoord::ZERO;
        let mut path = Vec::new();
        builder.step(&mut pos, &mut path, 0.0, 0.7);
        assert_eq!(pos, GridCoord::new(0, 7));
        assert_eq!(path, vec![GridCoord::new(0, 7)]);
    }

    #[test]
    fn test_heading_ninety_walks_negative_x() {
        let builder = TrajectoryBuilder::default();
        let mut pos = GridCoord::new(20, 20);
        let mut path = Vec::new();
        builder.step(&mut pos, &mut path, 90.0, 1.0);
        assert_eq!(pos, GridCoord::new(10, 20));
    }

    #[test]
    fn test_one_point_per_step() {
        let builder = TrajectoryBuilder::default();
        let mut pos = GridCoord::ZERO;
        let mut path = Vec::new();
        for (i, len) in [0.3, 0.7, 1.4, 2.0].iter().enumerate() {
            builder.step(&mut pos, &mut path, 33.0 * i as f64, *len);
            assert_eq!(path.len(), i + 1);
        }
    }

    #[test]
    fn test_subdivide_by_length() {
        let builder = TrajectoryBuilder::new(TrajectoryConfig {
            subdivide_by_length: true,
            ..Default::default()
        });
        let mut pos = GridCoord::ZERO;
        let mut path = Vec::new();
        builder.step(&mut pos, &mut path, 0.0, 0.5);
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&GridCoord::new(0, 1)));
        assert_eq!(path.last(), Some(&GridCoord::new(0, 5)));
    }

    #[test]
    fn test_replay_matches_incremental() {
        let builder = TrajectoryBuilder::default();
        let steps = [(10.0, 0.7), (20.0, 0.6), (200.0, 0.8)];

        let mut pos = GridCoord::new(5, 5);
        let mut path = Vec::new();
        for &(h, l) in &steps {
            builder.step(&mut pos, &mut path, h + 45.0, l);
        }

        let (replayed, end) = builder.replay(GridCoord::new(5, 5), &steps, 45.0);
        assert_eq!(replayed, path);
        assert_eq!(end, pos);
    }
}
