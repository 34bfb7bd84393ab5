//! Landing zones used to place the user after a floor change.
//!
//! Stairs tables are keyed by the departed floor, the travel direction and
//! a heading bucket. Elevator tables are keyed by the arrival heading
//! rounded to whole degrees. All coordinates are global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::key::FloorKey;
use crate::core::{ElevationMode, GridCoord, circular_diff, normalize_degrees};
use crate::error::Result;

/// Vertical travel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Moving to a higher floor
    Ascend,
    /// Moving to a lower floor
    Descend,
}

impl Direction {
    /// Direction of a move from `from` to `to`.
    pub fn between(from: i32, to: i32) -> Self {
        if to > from {
            Direction::Ascend
        } else {
            Direction::Descend
        }
    }
}

/// Stairs landings of one departed floor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StairsLandings {
    /// Heading bucket -> landing coordinates when going up
    #[serde(default)]
    pub ascend: BTreeMap<i32, Vec<GridCoord>>,
    /// Heading bucket -> landing coordinates when going down
    #[serde(default)]
    pub descend: BTreeMap<i32, Vec<GridCoord>>,
}

impl StairsLandings {
    fn buckets(&self, direction: Direction) -> &BTreeMap<i32, Vec<GridCoord>> {
        match direction {
            Direction::Ascend => &self.ascend,
            Direction::Descend => &self.descend,
        }
    }

    fn buckets_mut(&mut self, direction: Direction) -> &mut BTreeMap<i32, Vec<GridCoord>> {
        match direction {
            Direction::Ascend => &mut self.ascend,
            Direction::Descend => &mut self.descend,
        }
    }
}

/// Floor-change landing table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandingZoneTable {
    /// Departed floor label ("1F", "B1F", "basic") -> stairs landings
    #[serde(default)]
    pub stairs: BTreeMap<String, StairsLandings>,
    /// Rounded arrival heading -> elevator landing coordinates
    #[serde(default)]
    pub elevator: BTreeMap<i32, Vec<GridCoord>>,
}

impl LandingZoneTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Add stairs landings for leaving `from` in `direction` with a heading
    /// near `bucket`.
    pub fn insert_stairs(
        &mut self,
        from: FloorKey,
        direction: Direction,
        bucket: i32,
        coords: Vec<GridCoord>,
    ) {
        self.stairs
            .entry(from.label())
            .or_default()
            .buckets_mut(direction)
            .insert(bucket, coords);
    }

    /// Add elevator landings for arrival heading `heading`.
    pub fn insert_elevator(&mut self, heading: i32, coords: Vec<GridCoord>) {
        self.elevator.insert(heading.rem_euclid(360), coords);
    }

    /// Resolve the global landing coordinate.
    ///
    /// Stairs (and flat transitions) pick the heading bucket nearest to
    /// `arrival_heading`. When that bucket has two or more coordinates the
    /// one nearest to `last_global` is chosen; a single coordinate is used
    /// as is. Elevators use the first coordinate stored for the rounded
    /// heading.
    pub fn resolve(
        &self,
        from: FloorKey,
        direction: Direction,
        arrival_heading: f64,
        mode: ElevationMode,
        last_global: Option<GridCoord>,
    ) -> Option<GridCoord> {
        if mode == ElevationMode::Elevator {
            let key = (normalize_degrees(arrival_heading).round() as i32).rem_euclid(360);
            return self.elevator.get(&key).and_then(|c| c.first().copied());
        }

        let buckets = self.stairs.get(&from.label())?.buckets(direction);
        let coords = buckets
            .iter()
            .min_by(|(a, _), (b, _)| {
                circular_diff(arrival_heading, **a as f64)
                    .total_cmp(&circular_diff(arrival_heading, **b as f64))
            })
            .map(|(_, coords)| coords)?;

        match (coords.len(), last_global) {
            (0, _) => None,
            (1, _) | (_, None) => coords.first().copied(),
            (_, Some(last)) => coords
                .iter()
                .copied()
                .min_by_key(|c| c.distance_squared(&last)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LandingZoneTable {
        let mut table = LandingZoneTable::new();
        table.insert_stairs(
            FloorKey::Floor(1),
            Direction::Ascend,
            90,
            vec![GridCoord::new(100, 100), GridCoord::new(500, 500)],
        );
        table.insert_stairs(
            FloorKey::Floor(1),
            Direction::Ascend,
            270,
            vec![GridCoord::new(20, 30)],
        );
        table.insert_stairs(
            FloorKey::Floor(2),
            Direction::Descend,
            0,
            vec![GridCoord::new(7, 8)],
        );
        table.insert_elevator(180, vec![GridCoord::new(60, 70), GridCoord::new(61, 71)]);
        table
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::between(1, 2), Direction::Ascend);
        assert_eq!(Direction::between(2, -1), Direction::Descend);
    }

    #[test]
    fn test_nearest_bucket_and_coordinate() {
        let t = table();
        let near_second = t.resolve(
            FloorKey::Floor(1),
            Direction::Ascend,
            80.0,
            ElevationMode::Stairs,
            Some(GridCoord::new(480, 520)),
        );
        assert_eq!(near_second, Some(GridCoord::new(500, 500)));

        let near_first = t.resolve(
            FloorKey::Floor(1),
            Direction::Ascend,
            100.0,
            ElevationMode::Stairs,
            Some(GridCoord::new(90, 90)),
        );
        assert_eq!(near_first, Some(GridCoord::new(100, 100)));
    }

    #[test]
    fn test_single_coordinate_unfiltered() {
        let t = table();
        let landing = t.resolve(
            FloorKey::Floor(1),
            Direction::Ascend,
            260.0,
            ElevationMode::Flat,
            Some(GridCoord::new(900, 900)),
        );
        assert_eq!(landing, Some(GridCoord::new(20, 30)));
    }

    #[test]
    fn test_bucket_wraps_around_north() {
        let t = table();
        let landing = t.resolve(
            FloorKey::Floor(2),
            Direction::Descend,
            355.0,
            ElevationMode::Stairs,
            None,
        );
        assert_eq!(landing, Some(GridCoord::new(7, 8)));
    }

    #[test]
    fn test_elevator_rounded_heading() {
        let t = table();
        let landing = t.resolve(
            FloorKey::Floor(1),
            Direction::Ascend,
            179.6,
            ElevationMode::Elevator,
            None,
        );
        assert_eq!(landing, Some(GridCoord::new(60, 70)));
        assert_eq!(
            t.resolve(FloorKey::Floor(1), Direction::Ascend, 90.0, ElevationMode::Elevator, None),
            None
        );
    }

    #[test]
    fn test_unknown_floor() {
        let t = table();
        assert_eq!(
            t.resolve(FloorKey::Basic, Direction::Ascend, 90.0, ElevationMode::Stairs, None),
            None
        );
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
stairs:
  basic:
    descend:
      45:
        - { x: 12, y: 34 }
elevator:
  90:
    - { x: 1, y: 2 }
"#;
        let t = LandingZoneTable::from_yaml(yaml).unwrap();
        assert_eq!(
            t.resolve(FloorKey::Basic, Direction::Descend, 30.0, ElevationMode::Stairs, None),
            Some(GridCoord::new(12, 34))
        );
        assert_eq!(t.elevator.get(&90), Some(&vec![GridCoord::new(1, 2)]));
    }
}
