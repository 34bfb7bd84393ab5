//! Per-step position tracker.
//!
//! [`PositionTracker`] is the context object a host creates once per
//! session and feeds one [`StepInput`] per detected step. It owns the
//! calibrator, the active floor and the recovery controller; nothing is
//! global.
//!
//! # Step Flow
//!
//! ```text
//! StepInput ──▶ validate ──▶ floor changed? ──yes──▶ load floor, seed arrival
//!                                   │
//!                                   ▼
//!                        phase == Searching? ──yes──▶ coarse vote ──▶ unresolved
//!                                   │
//!                                   ▼
//!              extend + score 9 hypotheses (rayon) ──▶ rank ──▶ phase events
//!                                   │
//!                                   ▼
//!                        StepOutput ──▶ recovery check
//! ```

use crate::calibration::{
    CENTER_INDEX, CalibrationPhase, CalibrationStep, HeadingCalibrator, HypothesisSet,
};
use crate::config::DishaConfig;
use crate::core::{GridCoord, StepInput};
use crate::error::Result;
use crate::floor::{
    FloorAssetSource, FloorContext, FloorTransitionManager, LandingZoneTable, OriginTable,
};
use crate::matching::{BitCorrelationMatcher, INVALID_DISTANCE};
use crate::recovery::{RecoveryAction, RecoveryController, SearchHint};
use crate::trajectory::TrajectoryBuilder;

/// Result of one step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutput {
    /// Position in the active floor's grid, or (-1, -1)
    pub position: GridCoord,
    /// Position in the building frame, or (-1, -1)
    pub global_position: GridCoord,
    /// Position snapped onto the floor graph, when enabled and available
    pub snapped_position: Option<GridCoord>,
    /// Spread of the tied candidates in meters (lower is better)
    pub distance: f64,
    /// Whether `position` can be used
    pub success: bool,
    /// Resolved heading offset in degrees (0 while searching)
    pub calibration_angle: f64,
    /// Calibration phase after this step
    pub phase: CalibrationPhase,
    /// Active floor after this step
    pub floor: i32,
    /// Winning hypothesis, if hypotheses were evaluated
    pub best_index: Option<usize>,
    /// Match rate of the winning hypothesis
    pub match_rate: f64,
    /// Whether this step switched floors
    pub floor_changed: bool,
}

/// Indoor position tracker for one session.
pub struct PositionTracker {
    config: DishaConfig,
    matcher: BitCorrelationMatcher,
    calibrator: HeadingCalibrator,
    floors: FloorTransitionManager,
    recovery: RecoveryController,
    /// Last successful position (grid frame)
    last_position: Option<GridCoord>,
    /// Last successful position (building frame)
    last_global: Option<GridCoord>,
    /// Spread of the last successful match
    last_spread: Option<f64>,
}

impl PositionTracker {
    /// Create a tracker on `initial_floor`.
    pub fn new(
        config: DishaConfig,
        initial_floor: i32,
        assets: Box<dyn FloorAssetSource + Send + Sync>,
        landing: LandingZoneTable,
        origins: OriginTable,
    ) -> Result<Self> {
        config.validate()?;
        let matcher = BitCorrelationMatcher::new(config.matcher.clone());
        let calibrator = HeadingCalibrator::new(
            config.calibration.clone(),
            TrajectoryBuilder::new(config.trajectory.clone()),
        );
        let floors = FloorTransitionManager::new(
            config.floor.clone(),
            initial_floor,
            assets,
            landing,
            origins,
        );
        let recovery =
            RecoveryController::new(config.recovery.clone(), config.floor.new_floor_roi_radius);
        log::info!("Tracker: started on floor {}", initial_floor);

        Ok(Self {
            config,
            matcher,
            calibrator,
            floors,
            recovery,
            last_position: None,
            last_global: None,
            last_spread: None,
        })
    }

    /// Get configuration.
    pub fn config(&self) -> &DishaConfig {
        &self.config
    }

    /// Current calibration phase.
    pub fn phase(&self) -> CalibrationPhase {
        self.calibrator.phase()
    }

    /// The nine heading hypotheses.
    pub fn hypotheses(&self) -> &HypothesisSet {
        self.calibrator.hypotheses()
    }

    /// Floor the user is on.
    pub fn active_floor(&self) -> &FloorContext {
        self.floors.active()
    }

    /// Consecutive wins of the current best hypothesis.
    pub fn streak(&self) -> u32 {
        self.calibrator.streak()
    }

    /// Active search hint.
    pub fn search_hint(&self) -> SearchHint {
        self.recovery.hint()
    }

    /// Recorded coarse winners, oldest first.
    pub fn coarse_history(&self) -> Vec<f64> {
        self.calibrator.coarse_history()
    }

    /// Process one detected step.
    ///
    /// Invalid input is rejected before any state changes. A step that
    /// cannot be placed on the map is not an error; it comes back with
    /// `success == false` and the (-1, -1) sentinel.
    pub fn process_step(&mut self, input: &StepInput) -> Result<StepOutput> {
        input.validate()?;

        let floor_changed = self.floors.detect(input.floor);
        if floor_changed {
            let arrival = self.floors.transition(input, self.last_global);
            self.enter_floor(arrival.position);
        }

        if !self.calibrator.phase().is_locked() {
            if !floor_changed {
                self.calibrator
                    .observe_coarse(input.heading, input.compass, input.step_length);
            }
            return Ok(self.unresolved(floor_changed));
        }

        // the step that reports a new floor was taken on stairs or in a lift
        let motion = (!floor_changed).then_some((input.heading, input.step_length));
        let roi = self.recovery.roi();
        let step = self
            .calibrator
            .advance(motion, &self.matcher, &self.floors.active().grid, roi);

        let output = self.resolve(&step, floor_changed);
        let action = self.recovery.evaluate(&step.best().result);
        if let RecoveryAction::Research { center, radius } = action {
            self.research(center, Some(radius));
        }
        Ok(output)
    }

    /// Full session reset: calibration, hypotheses, history and hints.
    ///
    /// The active floor is kept.
    pub fn reset_session(&mut self) {
        self.calibrator.reset();
        self.recovery.clear();
        self.last_position = None;
        self.last_global = None;
        self.last_spread = None;
        log::info!("Tracker: session reset");
    }

    /// Re-search around `center` (grid frame) with `radius` cells.
    ///
    /// Without a centre the last successful position is used. The history
    /// is only reset while the last spread is below the configured limit;
    /// otherwise only the streak and active flags are reset. Returns whether
    /// the history was reset.
    pub fn research(&mut self, center: Option<GridCoord>, radius: Option<i32>) -> bool {
        if !self.recovery.allows_reset(self.last_spread) {
            self.calibrator.recover(None, false);
            log::info!(
                "Recovery: spread {:.2} too large, reactivating hypotheses only",
                self.last_spread.unwrap_or(INVALID_DISTANCE)
            );
            return false;
        }

        let radius = radius.unwrap_or(self.config.recovery.research_radius);
        let center = center.or(self.last_position);
        self.calibrator.recover(center, true);
        if let Some(center) = center {
            self.recovery.research(center, radius);
        }
        log::info!("Recovery: re-search at {:?} radius {}", center, radius);
        true
    }

    /// Re-search around a building-frame coordinate such as a stairwell.
    ///
    /// `radius` defaults to the stairs re-search radius.
    pub fn research_at_global(&mut self, global: GridCoord, radius: Option<i32>) -> bool {
        let center = self.floors.active().to_grid(global);
        let radius = radius.unwrap_or(self.config.recovery.stairs_research_radius);
        self.research(Some(center), Some(radius))
    }

    /// Swap to `floor` and restart the epoch at `arrival` (grid frame), or
    /// the grid origin.
    pub fn force_floor(&mut self, floor: i32, arrival: Option<GridCoord>) {
        let arrival = self.floors.force(floor, arrival);
        self.enter_floor(arrival.position);
    }

    fn enter_floor(&mut self, arrival: GridCoord) {
        self.calibrator.start_epoch(arrival, true);
        self.recovery.enter_new_floor(arrival);
        self.last_position = Some(arrival);
        self.last_global = Some(self.floors.active().to_global(arrival));
        self.last_spread = None;
    }

    fn unresolved(&self, floor_changed: bool) -> StepOutput {
        let calibration_angle = if self.calibrator.phase().is_locked() {
            self.calibrator
                .hypotheses()
                .get(CENTER_INDEX)
                .map_or(0.0, |h| h.offset)
        } else {
            0.0
        };
        StepOutput {
            position: GridCoord::INVALID,
            global_position: GridCoord::INVALID,
            snapped_position: None,
            distance: INVALID_DISTANCE,
            success: false,
            calibration_angle,
            phase: self.calibrator.phase(),
            floor: self.floors.active().floor,
            best_index: None,
            match_rate: 0.0,
            floor_changed,
        }
    }

    fn resolve(&mut self, step: &CalibrationStep, floor_changed: bool) -> StepOutput {
        let best = step.best();
        let result = &best.result;
        let ctx = self.floors.active();
        let success =
            result.is_match() && result.distance <= self.config.output.max_valid_distance;

        let (position, global_position, snapped_position) =
            match result.position.filter(|_| success) {
                Some(p) => {
                    let snapped = if self.config.output.snap_to_graph {
                        ctx.graph.snap(p)
                    } else {
                        None
                    };
                    (p, ctx.to_global(p), snapped)
                }
                None => (GridCoord::INVALID, GridCoord::INVALID, None),
            };
        let floor = ctx.floor;

        if success {
            self.last_position = Some(position);
            self.last_global = Some(global_position);
            self.last_spread = Some(result.distance);
        }

        StepOutput {
            position,
            global_position,
            snapped_position,
            distance: result.distance,
            success,
            calibration_angle: step.offset,
            phase: self.calibrator.phase(),
            floor,
            best_index: Some(step.ranking.best),
            match_rate: best.rate,
            floor_changed,
        }
    }
}
