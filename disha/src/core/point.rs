//! Integer grid coordinates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Grid coordinates (integer cell indices).
///
/// `x` indexes grid rows and `y` indexes grid columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// Row index
    pub x: i32,
    /// Column index
    pub y: i32,
}

impl GridCoord {
    /// Sentinel reported when no position could be resolved.
    pub const INVALID: GridCoord = GridCoord { x: -1, y: -1 };

    /// Origin cell.
    pub const ZERO: GridCoord = GridCoord { x: 0, y: 0 };

    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this is the failure sentinel.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        *self == Self::INVALID
    }

    /// Squared distance in cells (no sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &GridCoord) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        GridCoord::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridCoord::new(self.x - other.x, self.y - other.y)
    }
}
