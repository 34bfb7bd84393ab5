//! Calibration phase state machine.
//!
//! # State Machine
//!
//! ```text
//! ┌───────────┐  CoarseLock   ┌────────┐  FineTuneStart  ┌────────────┐
//! │ Searching │ ────────────▶ │ Locked │ ──────────────▶ │ FineTuning │
//! └───────────┘               └────────┘                 └─────┬──────┘
//!       ▲                                                      │ FineLock
//!       │                                                      ▼
//!       │            SessionReset (from any phase)       ┌────────────┐
//!       └─────────────────────────────────────────────── │ FineLocked │
//!                                                        └────────────┘
//! ```
//!
//! [`CalibrationPhase::transition`] is the only place a phase changes.

use serde::{Deserialize, Serialize};

/// Calibration progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalibrationPhase {
    /// Voting for a coarse offset from compass agreement
    #[default]
    Searching,
    /// Nine hypotheses around the coarse offset compete on the map
    Locked,
    /// Nine hypotheses around the best locked offset compete on the map
    FineTuning,
    /// Search collapsed onto one trajectory
    FineLocked,
}

/// Events that move the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Coarse vote reached the lock threshold
    CoarseLock,
    /// Best hypothesis held long enough with a clear lead
    FineTuneStart,
    /// Best fine hypothesis held long enough
    FineLock,
    /// Full session reset
    SessionReset,
}

impl CalibrationPhase {
    /// Transition table. Returns `None` when the event is not valid in the
    /// current phase.
    pub fn transition(self, event: PhaseEvent) -> Option<CalibrationPhase> {
        use CalibrationPhase::*;
        match (self, event) {
            (_, PhaseEvent::SessionReset) => Some(Searching),
            (Searching, PhaseEvent::CoarseLock) => Some(Locked),
            (Locked, PhaseEvent::FineTuneStart) => Some(FineTuning),
            (FineTuning, PhaseEvent::FineLock) => Some(FineLocked),
            _ => None,
        }
    }

    /// Whether a coarse offset has been resolved.
    #[inline]
    pub fn is_locked(&self) -> bool {
        !matches!(self, CalibrationPhase::Searching)
    }

    /// Get phase name for display
    pub fn name(&self) -> &'static str {
        match self {
            CalibrationPhase::Searching => "Searching",
            CalibrationPhase::Locked => "Locked",
            CalibrationPhase::FineTuning => "FineTuning",
            CalibrationPhase::FineLocked => "FineLocked",
        }
    }
}

impl std::fmt::Display for CalibrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
