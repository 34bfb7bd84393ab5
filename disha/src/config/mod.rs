//! Configuration loading.
//!
//! All settings live in one YAML file with defaults for every field.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use disha::config::DishaConfig;
//!
//! // Load from default path (configs/disha.yaml)
//! let config = DishaConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = DishaConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `matcher` | Search stride, cell size, parallel search |
//! | `trajectory` | Cells per meter, step subdivision |
//! | `calibration` | Coarse vote, hypothesis spacing, streaks |
//! | `floor` | New-floor ROI, shared upper floors |
//! | `recovery` | Drift thresholds and re-search radii |
//! | `output` | Validity threshold, graph snapping |
//!
//! ## Example YAML
//!
//! ```yaml
//! matcher:
//!   stride: 3              # every 3rd row and column
//! calibration:
//!   compass_north_offset_deg: 339.38
//! recovery:
//!   min_match_rate: 0.9
//! ```

mod defaults;
mod disha;
mod output;

pub use disha::DishaConfig;
pub use output::OutputConfig;
