//! Per-step input from the pedestrian dead-reckoning layer.

use serde::{Deserialize, Serialize};

use crate::error::{DishaError, Result};

/// How the user arrived on the reported floor.
///
/// Only consulted when the floor id changes between two steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElevationMode {
    /// Walked up or down a stairwell
    #[default]
    Stairs,
    /// No elevation change detected by the host
    Flat,
    /// Took an elevator
    Elevator,
}

/// One confirmed step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    /// Floor id reported by the host for this step
    pub floor: i32,
    /// Heading estimate from the orientation filter (degrees)
    pub heading: f64,
    /// Raw magnetic compass reading (degrees)
    pub compass: f64,
    /// Estimated step length (meters)
    pub step_length: f64,
    /// Monotonically increasing step counter
    pub step_count: u64,
    /// Heading when the floor change was detected (degrees)
    pub arrival_heading: f64,
    /// How the user changed floors
    pub elevation_mode: ElevationMode,
}

impl StepInput {
    /// A flat-walking step with no arrival information.
    pub fn new(floor: i32, heading: f64, compass: f64, step_length: f64, step_count: u64) -> Self {
        Self {
            floor,
            heading,
            compass,
            step_length,
            step_count,
            arrival_heading: heading,
            elevation_mode: ElevationMode::Flat,
        }
    }

    /// Attach floor-change arrival information.
    pub fn with_arrival(mut self, arrival_heading: f64, elevation_mode: ElevationMode) -> Self {
        self.arrival_heading = arrival_heading;
        self.elevation_mode = elevation_mode;
        self
    }

    /// Reject inputs that would poison the trajectory.
    pub fn validate(&self) -> Result<()> {
        if !self.heading.is_finite() {
            return Err(DishaError::InvalidInput(format!(
                "heading is not finite: {}",
                self.heading
            )));
        }
        if !self.compass.is_finite() {
            return Err(DishaError::InvalidInput(format!(
                "compass is not finite: {}",
                self.compass
            )));
        }
        if !self.arrival_heading.is_finite() {
            return Err(DishaError::InvalidInput(format!(
                "arrival heading is not finite: {}",
                self.arrival_heading
            )));
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(DishaError::InvalidInput(format!(
                "step length must be positive, got {}",
                self.step_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(StepInput::new(1, 10.0, 20.0, 0.7, 1).validate().is_ok());
        assert!(StepInput::new(1, f64::NAN, 20.0, 0.7, 1).validate().is_err());
        assert!(StepInput::new(1, 10.0, f64::INFINITY, 0.7, 1).validate().is_err());
        assert!(StepInput::new(1, 10.0, 20.0, 0.0, 1).validate().is_err());
        assert!(StepInput::new(1, 10.0, 20.0, -0.5, 1).validate().is_err());
    }

    #[test]
    fn test_with_arrival() {
        let step =
            StepInput::new(2, 10.0, 20.0, 0.7, 5).with_arrival(90.0, ElevationMode::Elevator);
        assert_eq!(step.arrival_heading, 90.0);
        assert_eq!(step.elevation_mode, ElevationMode::Elevator);
    }
}
