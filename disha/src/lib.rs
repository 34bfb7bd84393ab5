//! # Disha
//!
//! Indoor pedestrian positioning by matching dead-reckoned trajectories
//! against floor-plan occupancy grids.
//!
//! ## Overview
//!
//! Each detected step carries a gyro heading, a compass reading and a step
//! length. Disha turns those into grid trajectories and finds where they fit
//! on the walkable cells of the current floor:
//!
//! - **Coarse calibration** - votes for the gyro-to-building offset from
//!   compass agreement (45° candidates)
//! - **Hypothesis search** - nine offsets compete on the map, the weak ones
//!   drop out and the winner narrows the search
//! - **Bit correlation** - trajectory footprints are slid over a bit-packed
//!   grid with AND-popcount scoring
//! - **Floor changes** - stairs and elevator landings re-seed the search on
//!   the new floor
//! - **Recovery** - poor matches over long trajectories restart the epoch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use disha::{DishaConfig, PositionTracker, StepInput};
//! use disha::floor::{InMemoryFloorAssets, LandingZoneTable, OriginTable};
//!
//! let mut tracker = PositionTracker::new(
//!     DishaConfig::load_default()?,
//!     1,
//!     Box::new(assets),
//!     LandingZoneTable::new(),
//!     OriginTable::new(),
//! )?;
//!
//! let output = tracker.process_step(&StepInput::new(1, heading, compass, 0.7, n))?;
//! if output.success {
//!     println!("at {:?} ({:.1}°)", output.position, output.calibration_angle);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! - X: grid row, Y: grid column, 0.1 m cells
//! - Heading 0° moves along +Y, 90° along -X
//! - Building frame = grid frame + per-floor origin

#![warn(missing_docs)]

// Shared coordinates, angles and step input
pub mod core;

// Bit-packed occupancy grid
pub mod grid;

// Trajectory footprint correlation
pub mod matching;

// Dead reckoning
pub mod trajectory;

// Coarse lock, hypotheses, fine tuning
pub mod calibration;

// Floor assets, landings and transitions
pub mod floor;

// Drift recovery and search hints
pub mod recovery;

// YAML configuration
pub mod config;

// Session context object
pub mod tracker;

mod error;

pub use crate::core::{ElevationMode, GridCoord, StepInput, circular_diff, normalize_degrees};

pub use grid::{Footprint, OccupancyGrid};

pub use matching::{BitCorrelationMatcher, MatchResult, MatcherConfig, Roi, TrajectoryMatcher};

pub use trajectory::{TrajectoryBuilder, TrajectoryConfig};

pub use calibration::{CalibrationConfig, CalibrationPhase, HeadingCalibrator, Hypothesis};

pub use floor::{FloorAssetSource, FloorContext, FloorGraph, FloorKey, FloorTransitionManager};

pub use recovery::{RecoveryConfig, RecoveryController, SearchHint};

pub use config::DishaConfig;

pub use error::{DishaError, Result};

pub use tracker::{PositionTracker, StepOutput};
