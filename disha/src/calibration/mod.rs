//! Gyro heading calibration.
//!
//! The gyro heading drifts by an unknown constant offset from building
//! north. Calibration resolves that offset in two stages.
//!
//! # Pipeline
//!
//! ```text
//! Searching                     Locked / FineTuning / FineLocked
//! ┌────────────────────┐        ┌──────────────────────────────────────┐
//! │ CoarseCalibrator   │  lock  │ HypothesisSet (9 offsets)            │
//! │ 8 candidates, vote │ ─────▶ │   extend ─▶ score (rayon) ─▶ rank    │
//! │ against compass    │        │   HypothesisEvaluator: streak, phase │
//! └────────────────────┘        └──────────────────────────────────────┘
//! ```
//!
//! | Component | Role |
//! |-----------|------|
//! | [`CoarseCalibrator`] | Compass vote over 45° candidates |
//! | [`HypothesisSet`] | Nine offsets around the current base |
//! | [`HypothesisEvaluator`] | Scoring, deactivation, best selection, streak |
//! | [`CalibrationPhase`] | Phase transition table |
//! | [`HeadingCalibrator`] | Owns all of the above for one session |
//!
//! Spacing between hypotheses is 5° both after the coarse lock and during
//! fine tuning, so the locked set covers ±20° around the coarse winner.

mod calibrator;
mod coarse;
mod config;
mod evaluator;
mod hypothesis;
mod phase;

pub use calibrator::{CalibrationStep, HeadingCalibrator};
pub use coarse::{CoarseCalibrator, CoarseObservation};
pub use config::CalibrationConfig;
pub use evaluator::{HypothesisEvaluator, HypothesisScore, Ranking, compare_scores};
pub use hypothesis::{
    CENTER_INDEX, HYPOTHESIS_COUNT, Hypothesis, HypothesisSet, center_distance, slot_offset,
};
pub use phase::{CalibrationPhase, PhaseEvent};
