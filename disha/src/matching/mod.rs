//! Trajectory-to-map correlation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     CORRELATION PIPELINE                          │
//! │                                                                   │
//! │  Trajectory points                                               │
//! │       │                                                           │
//! │       ▼                                                           │
//! │  ┌───────────────┐    ┌─────────────────┐    ┌────────────────┐  │
//! │  │   Footprint   │ ──▶│ Strided offsets │ ──▶│ AND + popcount │  │
//! │  │ (normalized)  │    │ (ROI, anchor)   │    │  per placement │  │
//! │  └───────────────┘    └─────────────────┘    └────────────────┘  │
//! │                                                     │             │
//! │                                                     ▼             │
//! │                                   max score + tied placements     │
//! │                                                     │             │
//! │                                                     ▼             │
//! │                                    MatchResult (centroid, spread) │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`BitCorrelationMatcher`] | Strided, ROI-bounded bitwise correlation search |
//! | [`Roi`] | Circular region the footprint anchor must land in |
//! | [`MatchResult`] | Best score, tied placements, centroid and spread |
//! | [`TrajectoryMatcher`] | Seam for alternative matchers |
//!
//! ## Example
//!
//! ```rust
//! use disha::core::GridCoord;
//! use disha::grid::OccupancyGrid;
//! use disha::matching::{BitCorrelationMatcher, MatcherConfig, TrajectoryMatcher};
//!
//! let mut grid = OccupancyGrid::new(20, 20);
//! for y in 3..10 {
//!     grid.set(6, y, true);
//! }
//!
//! let matcher = BitCorrelationMatcher::new(MatcherConfig::default());
//! let path: Vec<GridCoord> = (0..7).map(|y| GridCoord::new(0, y)).collect();
//! let result = matcher.match_trajectory(&path, &grid, None);
//!
//! assert!(result.is_match());
//! assert_eq!(result.similarity, 7);
//! assert_eq!(result.position, Some(GridCoord::new(6, 9)));
//! ```

mod config;
mod correlation;
mod roi;
mod traits;
mod types;

pub use config::MatcherConfig;
pub use correlation::BitCorrelationMatcher;
pub use roi::Roi;
pub use traits::TrajectoryMatcher;
pub use types::{INVALID_DISTANCE, MatchResult};
