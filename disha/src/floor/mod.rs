//! Floor handling.
//!
//! Floor changes are detected from the caller-reported floor id. The new
//! floor's assets are loaded through a [`FloorAssetSource`] and the user is
//! placed at a landing coordinate resolved from a [`LandingZoneTable`].
//!
//! ## Coordinate Frames
//!
//! ```text
//! global (building) = grid + origin
//! ```
//!
//! Landing tables hold global coordinates; grids and graphs use the
//! floor's own grid frame; [`OriginTable`] links the two.
//!
//! | Type | Role |
//! |------|------|
//! | [`FloorKey`] | Floor id or the shared `basic` layout |
//! | [`FloorContext`] | Active grid, graph and origin |
//! | [`FloorGraph`] | Corridor graph used for snapping |
//! | [`LandingZoneTable`] | Stairs and elevator landings |
//! | [`FloorTransitionManager`] | Detection, landing resolution, context swap |

mod assets;
mod config;
mod context;
mod graph;
mod key;
mod landing;
mod origin;
mod transition;

pub use assets::{FloorAssetSource, InMemoryFloorAssets};
pub use config::FloorConfig;
pub use context::FloorContext;
pub use graph::{FloorGraph, GraphEdge, GraphNode};
pub use key::FloorKey;
pub use landing::{Direction, LandingZoneTable, StairsLandings};
pub use origin::OriginTable;
pub use transition::{FloorArrival, FloorTransitionManager};
