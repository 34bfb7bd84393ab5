//! Core types shared by every stage of the matching pipeline.
//!
//! ## Coordinate Convention
//!
//! Grid coordinates follow the floor-map bitmaps:
//! - **x**: row index into the occupancy grid
//! - **y**: column index into the occupancy grid
//! - One cell is 0.1 m by default
//!
//! Headings are compass-like degrees in `[0, 360)`. A heading of 0° walks
//! towards increasing `y`; 90° walks towards decreasing `x`.
//!
//! ## Type Categories
//!
//! - [`GridCoord`]: integer cell coordinate (trajectory points, positions)
//! - [`StepInput`] / [`ElevationMode`]: one confirmed step from the PDR layer
//! - [`circular_diff`] / [`normalize_degrees`]: degree arithmetic

mod angle;
mod point;
mod step;

pub use angle::{circular_diff, normalize_degrees};
pub use point::GridCoord;
pub use step::{ElevationMode, StepInput};
