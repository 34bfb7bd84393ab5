//! Hypothesis scoring, ranking and streak tracking.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::config::CalibrationConfig;
use super::hypothesis::{CENTER_INDEX, HypothesisSet, center_distance};
use super::phase::{CalibrationPhase, PhaseEvent};
use crate::grid::OccupancyGrid;
use crate::matching::{MatchResult, Roi, TrajectoryMatcher};

/// Match outcome for one hypothesis on one step.
#[derive(Clone, Debug, PartialEq)]
pub struct HypothesisScore {
    /// Slot index
    pub index: usize,
    /// Heading offset of the slot (degrees)
    pub offset: f64,
    /// Matcher output
    pub result: MatchResult,
    /// Similarity over trajectory length
    pub rate: f64,
    /// Whether the slot is still active after this step's deactivation
    pub active: bool,
}

impl HypothesisScore {
    /// Can this score be selected as best?
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.active && self.result.is_match()
    }
}

/// Ordering used for every best/second selection: higher rate first, then
/// the slot closer to the centre, then the lower index.
pub fn compare_scores(a: &HypothesisScore, b: &HypothesisScore) -> Ordering {
    b.rate
        .total_cmp(&a.rate)
        .then_with(|| center_distance(a.index).cmp(&center_distance(b.index)))
        .then_with(|| a.index.cmp(&b.index))
}

/// Best and second-best selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ranking {
    /// Best slot
    pub best: usize,
    /// Runner-up among eligible slots
    pub second: Option<usize>,
    /// No slot was eligible and the centre was forced
    pub forced: bool,
}

/// Scores hypotheses and decides phase transitions from the best-slot streak.
#[derive(Clone, Debug)]
pub struct HypothesisEvaluator {
    deactivation_rate: f64,
    fine_tune_streak: u32,
    fine_lock_streak: u32,
    min_rate_gap: f64,
    streak: u32,
    last_best: Option<usize>,
}

impl HypothesisEvaluator {
    /// Create an evaluator from configuration.
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            deactivation_rate: config.deactivation_rate,
            fine_tune_streak: config.fine_tune_streak,
            fine_lock_streak: config.fine_lock_streak,
            min_rate_gap: config.min_rate_gap,
            streak: 0,
            last_best: None,
        }
    }

    /// Consecutive steps the same slot has won, not counting the first.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Slot that won the previous step.
    pub fn last_best(&self) -> Option<usize> {
        self.last_best
    }

    /// Forget the streak.
    pub fn reset(&mut self) {
        self.streak = 0;
        self.last_best = None;
    }

    /// Match every active hypothesis on the rayon pool.
    ///
    /// Inactive slots get a failed result with similarity -1. Scores come
    /// back in slot order.
    pub fn score<M>(
        &self,
        set: &HypothesisSet,
        matcher: &M,
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> Vec<HypothesisScore>
    where
        M: TrajectoryMatcher + ?Sized,
    {
        let slots: Vec<_> = set.iter().collect();
        slots
            .par_iter()
            .map(|h| {
                let result = if h.active {
                    matcher.match_trajectory(&h.trajectory, grid, roi)
                } else {
                    MatchResult::failed(-1, h.trajectory.len())
                };
                let rate = result.match_rate();
                log::trace!(
                    "hypothesis {} offset {:.1}: sim {} / {} = {:.3}",
                    h.index,
                    h.offset,
                    result.similarity,
                    result.point_count,
                    rate
                );
                HypothesisScore {
                    index: h.index,
                    offset: h.offset,
                    result,
                    rate,
                    active: h.active,
                }
            })
            .collect()
    }

    /// Deactivate every active slot whose rate is at or below the threshold.
    pub fn deactivate(&self, set: &mut HypothesisSet, scores: &mut [HypothesisScore]) {
        for (h, score) in set.slots_mut().iter_mut().zip(scores.iter_mut()) {
            if h.active && score.rate <= self.deactivation_rate {
                h.active = false;
                score.active = false;
            }
        }
    }

    /// Pick best and second best among eligible scores.
    pub fn rank(scores: &[HypothesisScore]) -> Ranking {
        let mut eligible: Vec<&HypothesisScore> =
            scores.iter().filter(|s| s.is_eligible()).collect();
        eligible.sort_by(|a, b| compare_scores(a, b));

        match eligible.first() {
            Some(best) => Ranking {
                best: best.index,
                second: eligible.get(1).map(|s| s.index),
                forced: false,
            },
            None => Ranking {
                best: CENTER_INDEX,
                second: None,
                forced: true,
            },
        }
    }

    /// Update the streak with this step's ranking and return the phase
    /// event it triggers, if any.
    pub fn record(
        &mut self,
        ranking: &Ranking,
        scores: &[HypothesisScore],
        phase: CalibrationPhase,
    ) -> Option<PhaseEvent> {
        if self.last_best != Some(ranking.best) {
            self.streak = 0;
            self.last_best = Some(ranking.best);
            return None;
        }
        self.streak += 1;
        if ranking.forced {
            return None;
        }

        let event = match phase {
            CalibrationPhase::Locked if self.streak >= self.fine_tune_streak => {
                let second = ranking.second?;
                let gap = scores[ranking.best].rate - scores[second].rate;
                (second.abs_diff(ranking.best) == 1 && gap >= self.min_rate_gap)
                    .then_some(PhaseEvent::FineTuneStart)
            }
            CalibrationPhase::FineTuning if self.streak >= self.fine_lock_streak => {
                Some(PhaseEvent::FineLock)
            }
            _ => None,
        };
        if event.is_some() {
            self.streak = 0;
        }
        event
    }
}
