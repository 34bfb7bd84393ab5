//! Trajectory footprints used as correlation templates.

use crate::core::GridCoord;

use super::OccupancyGrid;

/// The set of cells a trajectory visited, shifted so its bounding box starts
/// at (0, 0).
#[derive(Clone, Debug)]
pub struct Footprint {
    bits: OccupancyGrid,
    /// Minimum corner subtracted from every trajectory point
    origin: GridCoord,
    /// First trajectory point in footprint coordinates
    anchor: GridCoord,
    /// Last trajectory point in footprint coordinates
    end: GridCoord,
    /// Number of trajectory points (duplicates included)
    point_count: usize,
}

impl Footprint {
    /// Rows and columns spanned by `points`, without allocating.
    ///
    /// Returns `None` for an empty trajectory.
    pub fn extent(points: &[GridCoord]) -> Option<(u64, u64)> {
        let (min, max) = bounds(points)?;
        let height = max.x as i64 - min.x as i64 + 1;
        let width = max.y as i64 - min.y as i64 + 1;
        Some((height as u64, width as u64))
    }

    /// Build a footprint from trajectory points.
    ///
    /// Allocates the whole bounding box; check [`Footprint::extent`] first
    /// when the points are not known to be compact. Returns `None` for an
    /// empty trajectory.
    pub fn from_points(points: &[GridCoord]) -> Option<Self> {
        let first = *points.first()?;
        let last = *points.last()?;
        let (origin, _) = bounds(points)?;
        let (height, width) = Self::extent(points)?;

        let mut bits = OccupancyGrid::new(height as usize, width as usize);
        for p in points {
            let local = *p - origin;
            bits.set(local.x, local.y, true);
        }

        Some(Self {
            bits,
            origin,
            anchor: first - origin,
            end: last - origin,
            point_count: points.len(),
        })
    }

    /// Bit pattern of the visited cells.
    #[inline]
    pub fn bits(&self) -> &OccupancyGrid {
        &self.bits
    }

    /// Rows spanned.
    #[inline]
    pub fn height(&self) -> usize {
        self.bits.height()
    }

    /// Columns spanned.
    #[inline]
    pub fn width(&self) -> usize {
        self.bits.width()
    }

    /// Offset that was subtracted from the trajectory.
    #[inline]
    pub fn origin(&self) -> GridCoord {
        self.origin
    }

    /// The trajectory's first point, used to fast-reject placements.
    #[inline]
    pub fn anchor(&self) -> GridCoord {
        self.anchor
    }

    /// The trajectory's current (last) point.
    #[inline]
    pub fn end(&self) -> GridCoord {
        self.end
    }

    /// Trajectory length in points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of distinct cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.bits.walkable_count()
    }
}

/// Minimum and maximum corners of the points.
fn bounds(points: &[GridCoord]) -> Option<(GridCoord, GridCoord)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (
            GridCoord::new(min.x.min(p.x), min.y.min(p.y)),
            GridCoord::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}
