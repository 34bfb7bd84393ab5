//! Bit-packed occupancy grid storage.

use crate::core::GridCoord;
use crate::error::{DishaError, Result};

/// Bits per storage block.
const BLOCK_BITS: usize = 64;

/// Mask with the lowest `bits` bits set.
#[inline]
fn low_mask(bits: usize) -> u64 {
    if bits >= BLOCK_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Walkable/non-walkable grid for one floor.
///
/// Cell `(x, y)` is bit `y % 64` of block `y / 64` in row `x`. The grid is
/// immutable once handed to the tracker; a floor change replaces it
/// wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyGrid {
    blocks: Vec<u64>,
    height: usize,
    width: usize,
    blocks_per_row: usize,
}

impl OccupancyGrid {
    /// Create an all-zero grid.
    pub fn new(height: usize, width: usize) -> Self {
        let blocks_per_row = width.div_ceil(BLOCK_BITS);
        Self {
            blocks: vec![0; height * blocks_per_row],
            height,
            width,
            blocks_per_row,
        }
    }

    /// A 0×0 grid, used when a floor's assets are unavailable.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Build from rows of 0/1 values.
    ///
    /// Ragged rows are allowed; missing cells are non-walkable. The width is
    /// the length of the longest row.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::new(rows.len(), width);

        for (x, row) in rows.iter().enumerate() {
            for (y, &value) in row.iter().enumerate() {
                match value {
                    0 => {}
                    1 => {
                        grid.set(x as i32, y as i32, true);
                    }
                    other => {
                        return Err(DishaError::InvalidGrid(format!(
                            "cell ({x}, {y}) has value {other}, expected 0 or 1"
                        )));
                    }
                }
            }
        }

        Ok(grid)
    }

    /// Parse whitespace-separated 0/1 rows, one grid row per text line.
    ///
    /// Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<u8>().map_err(|e| {
                        DishaError::InvalidGrid(format!(
                            "line {}: bad token {token:?}: {e}",
                            line_no + 1
                        ))
                    })
                })
                .collect::<Result<Vec<u8>>>()?;
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(&rows)
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Storage blocks per row.
    #[inline]
    pub fn blocks_per_row(&self) -> usize {
        self.blocks_per_row
    }

    /// True when the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Whether a coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.height
            && (coord.y as usize) < self.width
    }

    /// Read a cell. Out-of-range cells read as non-walkable.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.contains(GridCoord::new(x, y)) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let block = self.blocks[x * self.blocks_per_row + y / BLOCK_BITS];
        (block >> (y % BLOCK_BITS)) & 1 == 1
    }

    /// Write a cell. Returns `false` (and writes nothing) when out of range.
    pub fn set(&mut self, x: i32, y: i32, walkable: bool) -> bool {
        if !self.contains(GridCoord::new(x, y)) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let block = &mut self.blocks[x * self.blocks_per_row + y / BLOCK_BITS];
        let bit = 1u64 << (y % BLOCK_BITS);
        if walkable {
            *block |= bit;
        } else {
            *block &= !bit;
        }
        true
    }

    /// Packed blocks of one row.
    #[inline]
    pub fn row(&self, x: usize) -> &[u64] {
        let start = x * self.blocks_per_row;
        &self.blocks[start..start + self.blocks_per_row]
    }

    /// Extract `bits` consecutive cells of row `x` starting at column
    /// `col_start`, packed LSB-first into one block.
    ///
    /// Columns past the end of the grid read as zero.
    #[inline]
    pub fn extract_bits(&self, x: usize, col_start: usize, bits: usize) -> u64 {
        debug_assert!(bits <= BLOCK_BITS);
        if bits == 0 || col_start >= self.width {
            return 0;
        }
        let row = self.row(x);
        let index = col_start / BLOCK_BITS;
        let offset = col_start % BLOCK_BITS;

        let low = row[index] >> offset;
        let value = if offset + bits <= BLOCK_BITS || index + 1 >= row.len() {
            low
        } else {
            low | (row[index + 1] << (BLOCK_BITS - offset))
        };
        value & low_mask(bits)
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }
}
