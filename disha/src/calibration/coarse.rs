//! Coarse heading lock from compass agreement.
//!
//! Each step the gyro heading is rotated by every candidate offset and
//! compared with the compass. The candidate closest to the compass wins the
//! step. A win is recorded only when the winner's difference moved less than
//! the stability threshold since the previous step, which filters out steps
//! where the compass is disturbed. The first candidate to collect
//! `lock_votes` wins inside the `history_window` most recent recorded steps
//! becomes the coarse offset.

use std::collections::VecDeque;

use super::config::CalibrationConfig;
use crate::core::{circular_diff, normalize_degrees};

/// Outcome of one coarse observation.
#[derive(Clone, Debug, PartialEq)]
pub struct CoarseObservation {
    /// Candidate index closest to the compass
    pub winner: usize,
    /// Circular difference of the winner to the compass (degrees)
    pub difference: f64,
    /// Whether the win was recorded in the vote history
    pub recorded: bool,
    /// Offset that reached the vote threshold on this step
    pub locked: Option<f64>,
}

/// Compass-vote calibrator.
#[derive(Clone, Debug)]
pub struct CoarseCalibrator {
    candidates: Vec<f64>,
    stability_threshold: f64,
    history_window: usize,
    lock_votes: usize,
    /// Candidate differences from the previous step
    previous: Option<Vec<f64>>,
    /// Recorded winners, oldest first
    history: VecDeque<usize>,
}

impl CoarseCalibrator {
    /// Create a calibrator from configuration.
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            candidates: config.candidates(),
            stability_threshold: config.stability_threshold_deg,
            history_window: config.history_window.max(1),
            lock_votes: config.lock_votes.max(1),
            previous: None,
            history: VecDeque::with_capacity(config.history_window.max(1)),
        }
    }

    /// Candidate offsets in degrees.
    pub fn candidates(&self) -> &[f64] {
        &self.candidates
    }

    /// Recorded winners as offsets, oldest first.
    pub fn history(&self) -> Vec<f64> {
        self.history.iter().map(|&i| self.candidates[i]).collect()
    }

    /// Feed one step.
    ///
    /// `heading` is the raw gyro heading, `reference` the compass already
    /// rotated to building north.
    pub fn observe(&mut self, heading: f64, reference: f64) -> CoarseObservation {
        let differences: Vec<f64> = self
            .candidates
            .iter()
            .map(|&offset| circular_diff(normalize_degrees(heading + offset), reference))
            .collect();

        let winner = differences
            .iter()
            .enumerate()
            .fold(0, |best, (i, &d)| if d < differences[best] { i } else { best });
        let difference = differences[winner];

        let recorded = match &self.previous {
            Some(previous) => (difference - previous[winner]).abs() < self.stability_threshold,
            None => false,
        };
        self.previous = Some(differences);

        let mut locked = None;
        if recorded {
            self.history.push_back(winner);
            while self.history.len() > self.history_window {
                self.history.pop_front();
            }
            locked = self.vote_winner().map(|i| self.candidates[i]);
        }

        CoarseObservation {
            winner,
            difference,
            recorded,
            locked,
        }
    }

    /// Forget all observations.
    pub fn reset(&mut self) {
        self.previous = None;
        self.history.clear();
    }

    fn vote_winner(&self) -> Option<usize> {
        let mut votes = vec![0usize; self.candidates.len()];
        for &i in &self.history {
            votes[i] += 1;
        }
        votes.iter().position(|&v| v >= self.lock_votes)
    }
}
