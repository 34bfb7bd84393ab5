//! Bit-packed floor occupancy grids.
//!
//! ## Components
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`OccupancyGrid`] | One bit per cell, walkable = 1, one grid per floor |
//! | [`Footprint`] | A trajectory's visited cells normalized to a local origin |
//!
//! ## Memory Layout
//!
//! Rows are packed into 64-bit blocks, least significant bit first:
//!
//! ```text
//! row 0: [block 0: cols 0..64][block 1: cols 64..128]...
//! row 1: [block 0: cols 0..64][block 1: cols 64..128]...
//! ```
//!
//! A footprint uses the same layout, so correlating it against the floor
//! grid is a row-by-row AND followed by a popcount.

mod bitgrid;
mod footprint;

pub use bitgrid::OccupancyGrid;
pub use footprint::Footprint;
