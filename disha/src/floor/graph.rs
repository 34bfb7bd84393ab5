//! Walkable node/edge graph of a floor.
//!
//! The graph is only consulted for snapping a position onto the nearest
//! corridor segment. Coordinates are in the floor's grid frame.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Graph node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id referenced by edges
    pub id: String,
    /// Row coordinate
    pub x: f64,
    /// Column coordinate
    pub y: f64,
}

/// Undirected edge between two node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Start node id
    pub start: String,
    /// End node id
    pub end: String,
    /// Edge length as supplied with the map
    #[serde(default)]
    pub distance: f64,
}

/// Node/edge graph of one floor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorGraph {
    /// Nodes
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Edges
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl FloorGraph {
    /// Graph without nodes or edges.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no edge can be snapped to.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Project `point` onto the nearest edge segment.
    ///
    /// Edges with unknown endpoints are skipped. Returns `None` when no edge
    /// is usable.
    pub fn snap(&self, point: GridCoord) -> Option<GridCoord> {
        let index: HashMap<&str, (f64, f64)> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), (n.x, n.y)))
            .collect();
        let p = (point.x as f64, point.y as f64);

        self.edges
            .iter()
            .filter_map(|e| {
                let a = *index.get(e.start.as_str())?;
                let b = *index.get(e.end.as_str())?;
                let q = project_onto_segment(p, a, b);
                let d = (q.0 - p.0).powi(2) + (q.1 - p.1).powi(2);
                Some((d, q))
            })
            .min_by(|l, r| l.0.total_cmp(&r.0))
            .map(|(_, q)| GridCoord::new(q.0.round() as i32, q.1.round() as i32))
    }
}

/// Closest point to `p` on segment `a`-`b`.
fn project_onto_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    let ab = (b.0 - a.0, b.1 - a.1);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = (((p.0 - a.0) * ab.0 + (p.1 - a.1) * ab.1) / len_sq).clamp(0.0, 1.0);
    (a.0 + t * ab.0, a.1 + t * ab.1)
}
