//! Heading calibrator: coarse vote, hypothesis competition, fine tuning.

use super::coarse::{CoarseCalibrator, CoarseObservation};
use super::config::CalibrationConfig;
use super::evaluator::{HypothesisEvaluator, HypothesisScore, Ranking};
use super::hypothesis::{CENTER_INDEX, HypothesisSet};
use super::phase::{CalibrationPhase, PhaseEvent};
use crate::core::{GridCoord, normalize_degrees};
use crate::grid::OccupancyGrid;
use crate::matching::{Roi, TrajectoryMatcher};
use crate::trajectory::TrajectoryBuilder;

/// Result of one hypothesis step.
#[derive(Clone, Debug)]
pub struct CalibrationStep {
    /// Per-slot scores in slot order
    pub scores: Vec<HypothesisScore>,
    /// Best/second selection
    pub ranking: Ranking,
    /// Offset of the best slot when it was scored (degrees)
    pub offset: f64,
    /// Phase change triggered by this step
    pub event: Option<PhaseEvent>,
}

impl CalibrationStep {
    /// Score of the best slot.
    pub fn best(&self) -> &HypothesisScore {
        &self.scores[self.ranking.best]
    }
}

/// Owns the calibration phase and the nine hypotheses.
///
/// Steps are buffered from the start of the current epoch so that a lock
/// or the start of fine tuning can rebuild every hypothesis from the same
/// origin.
#[derive(Clone, Debug)]
pub struct HeadingCalibrator {
    config: CalibrationConfig,
    phase: CalibrationPhase,
    coarse: CoarseCalibrator,
    evaluator: HypothesisEvaluator,
    hypotheses: HypothesisSet,
    builder: TrajectoryBuilder,
    /// (heading, step length) since the epoch started
    pending: Vec<(f64, f64)>,
    epoch_origin: GridCoord,
    /// Point every trajectory starts with, if the epoch was seeded
    epoch_anchor: Option<GridCoord>,
}

impl HeadingCalibrator {
    /// Create a calibrator in the searching phase.
    pub fn new(config: CalibrationConfig, builder: TrajectoryBuilder) -> Self {
        Self {
            coarse: CoarseCalibrator::new(&config),
            evaluator: HypothesisEvaluator::new(&config),
            hypotheses: HypothesisSet::around(0.0, config.locked_spacing_deg, GridCoord::ZERO),
            phase: CalibrationPhase::Searching,
            builder,
            pending: Vec::new(),
            epoch_origin: GridCoord::ZERO,
            epoch_anchor: None,
            config,
        }
    }

    /// Get configuration.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// The nine hypotheses.
    pub fn hypotheses(&self) -> &HypothesisSet {
        &self.hypotheses
    }

    /// Consecutive wins of the current best slot.
    pub fn streak(&self) -> u32 {
        self.evaluator.streak()
    }

    /// Recorded coarse winners, oldest first.
    pub fn coarse_history(&self) -> Vec<f64> {
        self.coarse.history()
    }

    /// Steps buffered in the current epoch.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Where the current epoch started.
    pub fn epoch_origin(&self) -> GridCoord {
        self.epoch_origin
    }

    /// Feed a step while searching for the coarse offset.
    ///
    /// Locks and rebuilds the hypotheses when the vote succeeds.
    pub fn observe_coarse(
        &mut self,
        heading: f64,
        compass: f64,
        step_length: f64,
    ) -> CoarseObservation {
        self.pending.push((heading, step_length));
        let reference = normalize_degrees(compass - self.config.compass_north_offset_deg);
        let observation = self.coarse.observe(heading, reference);
        log::debug!(
            "Coarse: winner {} diff {:.1} recorded {}",
            self.coarse.candidates()[observation.winner],
            observation.difference,
            observation.recorded
        );

        if let Some(offset) = observation.locked {
            self.hypotheses = HypothesisSet::replayed(
                &self.builder,
                offset,
                self.config.locked_spacing_deg,
                self.epoch_origin,
                self.epoch_anchor,
                &self.pending,
            );
            self.evaluator.reset();
            self.apply(PhaseEvent::CoarseLock);
            log::info!(
                "Calibration: coarse lock at {:.0}° after {} steps",
                offset,
                self.pending.len()
            );
        }
        observation
    }

    /// Extend, score and select among the hypotheses for one step.
    ///
    /// `motion` is the (heading, step length) pair to integrate; `None`
    /// scores the current trajectories as they are. The step is evaluated on
    /// a copy of the hypotheses which replaces the current set once
    /// selection and any phase change are done.
    pub fn advance<M>(
        &mut self,
        motion: Option<(f64, f64)>,
        matcher: &M,
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> CalibrationStep
    where
        M: TrajectoryMatcher + ?Sized,
    {
        let mut candidate = self.hypotheses.clone();
        if let Some((heading, step_length)) = motion {
            self.pending.push((heading, step_length));
            candidate.extend(&self.builder, heading, step_length);
        }

        let mut scores = self.evaluator.score(&candidate, matcher, grid, roi);
        self.evaluator.deactivate(&mut candidate, &mut scores);

        let ranking = HypothesisEvaluator::rank(&scores);
        if ranking.forced {
            log::warn!("Calibration: no eligible hypothesis, forcing centre");
            candidate.slots_mut()[CENTER_INDEX].active = true;
            scores[CENTER_INDEX].active = true;
        }
        let offset = scores[ranking.best].offset;
        log::debug!(
            "Calibration: best {} ({:.1}°) rate {:.3} second {:?} active {}",
            ranking.best,
            offset,
            scores[ranking.best].rate,
            ranking.second,
            candidate.active_count()
        );

        let event = self.evaluator.record(&ranking, &scores, self.phase);
        match event {
            Some(PhaseEvent::FineTuneStart) => {
                candidate = HypothesisSet::replayed(
                    &self.builder,
                    offset,
                    self.config.fine_spacing_deg,
                    self.epoch_origin,
                    self.epoch_anchor,
                    &self.pending,
                );
                log::info!("Calibration: fine tuning around {:.1}°", offset);
            }
            Some(PhaseEvent::FineLock) => {
                candidate.recenter(offset, self.config.fine_spacing_deg);
                log::info!("Calibration: fine lock at {:.1}°", offset);
            }
            _ => {}
        }
        if let Some(event) = event {
            self.apply(event);
        }

        if self.phase == CalibrationPhase::FineLocked {
            candidate.collapse_onto(ranking.best);
        }
        self.hypotheses = candidate;

        CalibrationStep {
            scores,
            ranking,
            offset,
            event,
        }
    }

    /// Start a new epoch at `origin`.
    ///
    /// Clears the step buffer and every trajectory. With `seed` set the
    /// origin becomes the first point of every trajectory.
    pub fn start_epoch(&mut self, origin: GridCoord, seed: bool) {
        self.pending.clear();
        self.epoch_origin = origin;
        self.epoch_anchor = seed.then_some(origin);
        self.hypotheses.restart(origin, seed);
        self.evaluator.reset();
    }

    /// Re-search after a poor match.
    ///
    /// With `reset_history` the epoch restarts at `center`, or at the
    /// current centre hypothesis position when none is given. Otherwise
    /// only the streak and the active flags are reset.
    pub fn recover(&mut self, center: Option<GridCoord>, reset_history: bool) {
        if reset_history {
            let origin = center.unwrap_or_else(|| {
                self.hypotheses
                    .get(CENTER_INDEX)
                    .map(|h| h.position)
                    .unwrap_or(self.epoch_origin)
            });
            self.start_epoch(origin, false);
        } else {
            self.hypotheses.reactivate_all();
            self.evaluator.reset();
        }
    }

    /// Back to searching with no history.
    pub fn reset(&mut self) {
        self.apply(PhaseEvent::SessionReset);
        self.coarse.reset();
        self.evaluator.reset();
        self.pending.clear();
        self.epoch_origin = GridCoord::ZERO;
        self.epoch_anchor = None;
        self.hypotheses =
            HypothesisSet::around(0.0, self.config.locked_spacing_deg, GridCoord::ZERO);
    }

    fn apply(&mut self, event: PhaseEvent) {
        match self.phase.transition(event) {
            Some(next) => self.phase = next,
            None => log::debug!("Calibration: ignoring {:?} in {}", event, self.phase),
        }
    }
}
