//! Floor change scenarios.

mod common;

use common::*;
use disha::floor::{Direction, FloorKey, LandingZoneTable, OriginTable};
use disha::{CalibrationPhase, DishaConfig, ElevationMode, GridCoord, SearchHint, StepInput};

fn landing_table() -> LandingZoneTable {
    let mut table = LandingZoneTable::new();
    table.insert_stairs(
        FloorKey::Floor(1),
        Direction::Ascend,
        0,
        vec![GridCoord::new(150, 260)],
    );
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
        180,
        vec![GridCoord::new(40, 44)],
    );
    table.insert_stairs(
        FloorKey::Basic,
        Direction::Ascend,
        0,
        vec![GridCoord::new(77, 88)],
    );
    table.insert_elevator(90, vec![GridCoord::new(30, 40), GridCoord::new(31, 41)]);
    table
}

fn origins() -> OriginTable {
    OriginTable::new()
        .with(FloorKey::Floor(2), GridCoord::new(100, 200))
        .with(FloorKey::Floor(3), GridCoord::new(10, 10))
        .with(FloorKey::Basic, GridCoord::new(7, 8))
}

fn building_tracker() -> disha::PositionTracker {
    building(
        vec![
            (FloorKey::Floor(1), open_grid(64, 128)),
            (FloorKey::Floor(2), open_grid(128, 128)),
            (FloorKey::Floor(3), open_grid(64, 64)),
            (FloorKey::Basic, open_grid(64, 64)),
        ],
        landing_table(),
        origins(),
        DishaConfig::default(),
    )
}

fn stairs(floor: i32, heading: f64, n: u64) -> StepInput {
    StepInput::new(floor, heading, heading, STEP, n).with_arrival(heading, ElevationMode::Stairs)
}

#[test]
fn test_floor_change_reseeds_at_arrival() {
    let mut tracker = building_tracker();
    let mut counter = 0;
    walk(&mut tracker, 1, 0.0, 0.0, 11, &mut counter);
    assert_eq!(tracker.phase(), CalibrationPhase::Locked);
    assert!(
        tracker
            .hypotheses()
            .iter()
            .all(|h| h.trajectory.len() == 11)
    );

    let out = tracker.process_step(&stairs(2, 0.0, 12)).unwrap();
    let arrival = GridCoord::new(50, 60);

    assert!(out.floor_changed);
    assert_eq!(out.floor, 2);
    assert_eq!(tracker.active_floor().floor, 2);
    assert_eq!(tracker.active_floor().origin, GridCoord::new(100, 200));
    assert_eq!(tracker.search_hint(), SearchHint::NewFloor { center: arrival });
    for h in tracker.hypotheses().iter() {
        assert_eq!(h.trajectory, vec![arrival]);
        assert_eq!(h.position, arrival);
        assert!(h.active);
    }

    // next step walks on from the arrival
    counter = 12;
    walk(&mut tracker, 2, 0.0, 0.0, 1, &mut counter);
    let center = tracker.hypotheses().get(4).unwrap();
    assert_eq!(center.trajectory, vec![arrival, GridCoord::new(50, 67)]);
    assert_eq!(tracker.phase(), CalibrationPhase::Locked);
}

#[test]
fn test_two_landings_pick_nearest_to_last_position() {
    let mut tracker = building_tracker();
    tracker.force_floor(1, Some(GridCoord::new(480, 520)));

    tracker.process_step(&stairs(2, 80.0, 1)).unwrap();
    // (500, 500) is nearer than (100, 100); floor 2 origin is (100, 200)
    let expected = GridCoord::new(400, 300);
    assert_eq!(tracker.search_hint(), SearchHint::NewFloor { center: expected });
    assert!(tracker.hypotheses().iter().all(|h| h.position == expected));
}

#[test]
fn test_two_landings_other_side() {
    let mut tracker = building_tracker();
    tracker.force_floor(1, Some(GridCoord::new(90, 120)));

    tracker.process_step(&stairs(2, 95.0, 1)).unwrap();
    assert_eq!(
        tracker.search_hint(),
        SearchHint::NewFloor {
            center: GridCoord::new(0, -100)
        }
    );
}

#[test]
fn test_single_landing_used_unfiltered() {
    let mut tracker = building_tracker();
    tracker.force_floor(1, Some(GridCoord::new(900, 900)));

    tracker.process_step(&stairs(2, 265.0, 1)).unwrap();
    assert_eq!(
        tracker.search_hint(),
        SearchHint::NewFloor {
            center: GridCoord::new(-80, -170)
        }
    );
}

#[test]
fn test_descend_uses_departed_floor_table() {
    let mut tracker = building_tracker();
    tracker.force_floor(2, None);

    tracker.process_step(&stairs(1, 170.0, 1)).unwrap();
    assert_eq!(tracker.active_floor().floor, 1);
    assert_eq!(
        tracker.search_hint(),
        SearchHint::NewFloor {
            center: GridCoord::new(40, 44)
        }
    );
}

#[test]
fn test_elevator_lookup_by_rounded_heading() {
    let mut tracker = building_tracker();
    let input = StepInput::new(3, 10.0, 10.0, STEP, 1).with_arrival(90.4, ElevationMode::Elevator);
    let out = tracker.process_step(&input).unwrap();

    assert!(out.floor_changed);
    assert_eq!(tracker.active_floor().key, FloorKey::Floor(3));
    assert_eq!(
        tracker.search_hint(),
        SearchHint::NewFloor {
            center: GridCoord::new(20, 30)
        }
    );
}

#[test]
fn test_upper_floors_share_basic_assets() {
    let mut tracker = building_tracker();
    tracker.force_floor(5, None);
    assert_eq!(tracker.active_floor().key, FloorKey::Basic);
    assert!(!tracker.active_floor().grid.is_empty());

    tracker.process_step(&stairs(6, 0.0, 1)).unwrap();
    assert_eq!(tracker.active_floor().floor, 6);
    assert_eq!(
        tracker.search_hint(),
        SearchHint::NewFloor {
            center: GridCoord::new(70, 80)
        }
    );
}

#[test]
fn test_missing_floor_degrades_to_failure() {
    let mut tracker = tracker_on(open_grid(64, 128), DishaConfig::default());
    let mut counter = 0;
    walk(&mut tracker, 1, 0.0, 0.0, 11, &mut counter);
    assert_eq!(tracker.phase(), CalibrationPhase::Locked);

    let out = tracker.process_step(&stairs(-1, 0.0, 12)).unwrap();
    assert!(out.floor_changed);
    assert!(!out.success);
    assert_eq!(out.position, GridCoord::INVALID);
    assert!(tracker.active_floor().grid.is_empty());
    assert_eq!(
        tracker.search_hint(),
        SearchHint::NewFloor {
            center: GridCoord::ZERO
        }
    );

    // the centre hypothesis is kept alive
    assert!(tracker.hypotheses().get(4).unwrap().active);
}
