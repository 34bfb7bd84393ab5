//! Bitwise correlation search over an occupancy grid.

use rayon::prelude::*;

use crate::core::GridCoord;
use crate::grid::{Footprint, OccupancyGrid};

use super::config::MatcherConfig;
use super::roi::Roi;
use super::traits::TrajectoryMatcher;
use super::types::MatchResult;

/// Footprints taller than this sum their row popcounts on the rayon pool.
const PARALLEL_ROWS_MIN: usize = 64;

/// Inclusive placement window (top-left offsets of the footprint).
#[derive(Clone, Copy, Debug)]
struct SearchWindow {
    start_row: usize,
    end_row: usize,
    start_col: usize,
    end_col: usize,
}

/// Running maximum with every placement that ties it.
///
/// Merging is associative and commutative up to the order of `offsets`,
/// which is sorted once the reduction finishes.
#[derive(Clone, Debug)]
struct TieAccumulator {
    score: i64,
    offsets: Vec<GridCoord>,
}

impl Default for TieAccumulator {
    fn default() -> Self {
        Self {
            score: -1,
            offsets: Vec::new(),
        }
    }
}

impl TieAccumulator {
    #[inline]
    fn offer(&mut self, score: i64, offset: GridCoord) {
        if score > self.score {
            self.score = score;
            self.offsets.clear();
            self.offsets.push(offset);
        } else if score == self.score {
            self.offsets.push(offset);
        }
    }

    fn merge(mut self, mut other: Self) -> Self {
        if other.score > self.score {
            return other;
        }
        if other.score == self.score {
            self.offsets.append(&mut other.offsets);
        }
        self
    }
}

/// Bit-correlation matcher.
///
/// Slides a trajectory footprint over the floor grid on a fixed stride and
/// keeps every placement with the highest AND-popcount.
pub struct BitCorrelationMatcher {
    config: MatcherConfig,
}

impl BitCorrelationMatcher {
    /// Create a new matcher.
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MatcherConfig::default())
    }

    /// Get configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Correlate a prepared footprint against the grid.
    pub fn match_footprint(
        &self,
        footprint: &Footprint,
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> MatchResult {
        let point_count = footprint.point_count();
        let Some(window) = self.search_window(footprint, grid, roi) else {
            return MatchResult::failed(-1, point_count);
        };

        let stride = self.config.stride.max(1);
        let first_row = window.start_row.next_multiple_of(stride);
        let rows: Vec<usize> = (first_row..=window.end_row).step_by(stride).collect();

        let best = if self.config.use_parallel {
            rows.par_iter()
                .fold(TieAccumulator::default, |acc, &row| {
                    self.scan_row(acc, row, &window, footprint, grid, roi)
                })
                .reduce(TieAccumulator::default, TieAccumulator::merge)
        } else {
            rows.iter().fold(TieAccumulator::default(), |acc, &row| {
                self.scan_row(acc, row, &window, footprint, grid, roi)
            })
        };

        if best.score <= 0 || best.offsets.is_empty() {
            return MatchResult::failed(best.score.clamp(-1, 0) as i32, point_count);
        }

        let mut offsets = best.offsets;
        offsets.sort_unstable_by_key(|c| (c.x, c.y));

        let end = footprint.end();
        let ends: Vec<GridCoord> = offsets.iter().map(|&o| o + end).collect();
        let (position, distance) = centroid_and_spread(&ends, self.config.cell_size_m);

        MatchResult {
            similarity: best.score as i32,
            offsets,
            position: Some(position),
            distance,
            point_count,
        }
    }

    /// Popcount of `footprint AND grid` with the footprint's top-left corner
    /// placed at `(row, col)`.
    ///
    /// The placement must keep the whole footprint inside the grid.
    pub fn similarity_at(
        &self,
        grid: &OccupancyGrid,
        footprint: &Footprint,
        row: usize,
        col: usize,
    ) -> u32 {
        let bits = footprint.bits();
        let blocks = bits.blocks_per_row();
        let tail = footprint.width() % 64;

        let row_score = |r: usize| -> u32 {
            bits.row(r)
                .iter()
                .enumerate()
                .map(|(b, &pattern)| {
                    let width = if b + 1 == blocks && tail != 0 { tail } else { 64 };
                    (grid.extract_bits(row + r, col + b * 64, width) & pattern).count_ones()
                })
                .sum()
        };

        if self.config.use_parallel && footprint.height() >= PARALLEL_ROWS_MIN {
            (0..footprint.height()).into_par_iter().map(row_score).sum()
        } else {
            (0..footprint.height()).map(row_score).sum()
        }
    }

    /// Placements that keep the footprint inside the grid, clipped to the
    /// ROI's bounding box when one is given.
    fn search_window(
        &self,
        footprint: &Footprint,
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> Option<SearchWindow> {
        if grid.is_empty()
            || footprint.height() > grid.height()
            || footprint.width() > grid.width()
        {
            return None;
        }

        let max_row = (grid.height() - footprint.height()) as i64;
        let max_col = (grid.width() - footprint.width()) as i64;
        let (mut start_row, mut end_row, mut start_col, mut end_col) = (0, max_row, 0, max_col);

        if let Some(roi) = roi {
            let anchor = footprint.anchor();
            let r = roi.radius as i64;
            start_row = (roi.center.x as i64 - r - anchor.x as i64).max(0);
            end_row = (roi.center.x as i64 + r - anchor.x as i64).min(max_row);
            start_col = (roi.center.y as i64 - r - anchor.y as i64).max(0);
            end_col = (roi.center.y as i64 + r - anchor.y as i64).min(max_col);
        }

        if start_row > end_row || start_col > end_col {
            return None;
        }

        Some(SearchWindow {
            start_row: start_row as usize,
            end_row: end_row as usize,
            start_col: start_col as usize,
            end_col: end_col as usize,
        })
    }

    fn scan_row(
        &self,
        mut acc: TieAccumulator,
        row: usize,
        window: &SearchWindow,
        footprint: &Footprint,
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> TieAccumulator {
        let stride = self.config.stride.max(1);
        let anchor = footprint.anchor();
        let first_col = window.start_col.next_multiple_of(stride);

        for col in (first_col..=window.end_col).step_by(stride) {
            let landing = GridCoord::new(row as i32 + anchor.x, col as i32 + anchor.y);

            // Anchor must land on a walkable cell
            if !grid.get(landing.x, landing.y) {
                continue;
            }
            if let Some(roi) = roi
                && !roi.contains(landing)
            {
                continue;
            }

            let score = self.similarity_at(grid, footprint, row, col) as i64;
            acc.offer(score, GridCoord::new(row as i32, col as i32));
        }

        acc
    }
}

impl TrajectoryMatcher for BitCorrelationMatcher {
    fn match_trajectory(
        &self,
        points: &[GridCoord],
        grid: &OccupancyGrid,
        roi: Option<Roi>,
    ) -> MatchResult {
        let Some((height, width)) = Footprint::extent(points) else {
            return MatchResult::failed(-1, 0);
        };
        // Never allocate a footprint that cannot fit
        if height > grid.height() as u64 || width > grid.width() as u64 {
            return MatchResult::failed(-1, points.len());
        }
        match Footprint::from_points(points) {
            Some(footprint) => self.match_footprint(&footprint, grid, roi),
            None => MatchResult::failed(-1, points.len()),
        }
    }

    fn name(&self) -> &str {
        "bit-correlation"
    }
}

/// Centroid of the candidates, truncated toward zero, and their mean distance
/// from the exact centroid, scaled to meters.
fn centroid_and_spread(points: &[GridCoord], cell_size: f64) -> (GridCoord, f64) {
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
    let mean_x = sum_x as f64 / n;
    let mean_y = sum_y as f64 / n;

    let total: f64 = points
        .iter()
        .map(|p| {
            let dx = p.x as f64 - mean_x;
            let dy = p.y as f64 - mean_y;
            (dx * dx + dy * dy).sqrt()
        })
        .sum();

    (
        GridCoord::new(mean_x.trunc() as i32, mean_y.trunc() as i32),
        total / n * cell_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sequential() -> BitCorrelationMatcher {
        BitCorrelationMatcher::new(MatcherConfig {
            use_parallel: false,
            ..Default::default()
        })
    }

    /// Straight walk north at 0.7 m per step (7 cells), first step at y = 7.
    fn straight_path(steps: i32) -> Vec<GridCoord> {
        (1..=steps).map(|k| GridCoord::new(0, 7 * k)).collect()
    }

    fn embed(grid: &mut OccupancyGrid, points: &[GridCoord], at: GridCoord) {
        let fp = Footprint::from_points(points).unwrap();
        for p in points {
            let cell = *p - fp.origin() + at;
            grid.set(cell.x, cell.y, true);
        }
    }

    #[test]
    fn test_all_zero_grid_fails() {
        let grid = OccupancyGrid::new(50, 50);
        let result = sequential().match_trajectory(&[GridCoord::new(3, 3)], &grid, None);
        assert!(result.similarity <= 0);
        assert!(result.position.is_none());
        assert!(!result.is_match());
    }

    #[test]
    fn test_empty_trajectory_fails() {
        let grid = OccupancyGrid::new(10, 10);
        let result = sequential().match_trajectory(&[], &grid, None);
        assert_eq!(result.similarity, -1);
        assert!(!result.is_match());
    }

    #[test]
    fn test_empty_grid_fails() {
        let grid = OccupancyGrid::empty();
        let result = sequential().match_trajectory(&[GridCoord::ZERO], &grid, None);
        assert!(!result.is_match());
    }

    #[test]
    fn test_footprint_larger_than_grid_fails() {
        let grid = OccupancyGrid::new(5, 5);
        let result = sequential().match_trajectory(&straight_path(3), &grid, None);
        assert!(!result.is_match());
    }

    #[test]
    fn test_embedded_straight_line() {
        let path = straight_path(10);
        let offset = GridCoord::new(30, 21);
        let mut grid = OccupancyGrid::new(100, 100);
        embed(&mut grid, &path, offset);

        for matcher in [sequential(), BitCorrelationMatcher::with_defaults()] {
            let result = matcher.match_trajectory(&path, &grid, None);
            assert_eq!(result.similarity, 10);
            assert_eq!(result.offsets, vec![offset]);
            assert_eq!(result.position, Some(GridCoord::new(30, 84)));
            assert_relative_eq!(result.match_rate(), 1.0);
            assert_relative_eq!(result.distance, 0.0);
        }
    }

    #[test]
    fn test_score_bounded_by_footprint() {
        let path = straight_path(6);
        let fp = Footprint::from_points(&path).unwrap();
        let mut grid = OccupancyGrid::new(12, 60);
        for x in 0..12 {
            for y in 0..60 {
                grid.set(x, y, (x + y) % 2 == 0);
            }
        }
        let matcher = sequential();
        for row in 0..=(grid.height() - fp.height()) {
            for col in 0..=(grid.width() - fp.width()) {
                let s = matcher.similarity_at(&grid, &fp, row, col) as usize;
                assert!(s <= fp.cell_count());
            }
        }
    }

    #[test]
    fn test_ties_are_kept() {
        // Two identical corridors; both placements tie
        let path: Vec<GridCoord> = (0..4).map(|y| GridCoord::new(0, y)).collect();
        let mut grid = OccupancyGrid::new(10, 20);
        for y in 0..4 {
            grid.set(3, y, true);
            grid.set(3, 12 + y, true);
        }
        let result = sequential().match_trajectory(&path, &grid, None);
        assert_eq!(result.similarity, 4);
        assert_eq!(result.offsets, vec![GridCoord::new(3, 0), GridCoord::new(3, 12)]);
        // End points (3,3) and (3,15), centroid (3,9), each 6 cells away
        assert_eq!(result.position, Some(GridCoord::new(3, 9)));
        assert_relative_eq!(result.distance, 0.6, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let path: Vec<GridCoord> = (0..5).map(|y| GridCoord::new(y / 2, y)).collect();
        let mut grid = OccupancyGrid::new(40, 40);
        for x in 0..40 {
            for y in 0..40 {
                grid.set(x, y, (x * 7 + y * 3) % 5 != 0);
            }
        }
        let a = sequential().match_trajectory(&path, &grid, None);
        let b = BitCorrelationMatcher::with_defaults().match_trajectory(&path, &grid, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_roi_restricts_search() {
        let path: Vec<GridCoord> = (0..4).map(|y| GridCoord::new(0, y)).collect();
        let mut grid = OccupancyGrid::new(10, 20);
        for y in 0..4 {
            grid.set(3, y, true);
            grid.set(3, 12 + y, true);
        }
        let roi = Roi::new(GridCoord::new(3, 12), 2);
        let result = sequential().match_trajectory(&path, &grid, Some(roi));
        assert_eq!(result.offsets, vec![GridCoord::new(3, 12)]);
        assert_eq!(result.position, Some(GridCoord::new(3, 15)));
    }

    #[test]
    fn test_far_apart_points_fail_without_footprint() {
        let mut grid = OccupancyGrid::new(64, 64);
        grid.set(0, 0, true);
        let points = [GridCoord::new(0, 0), GridCoord::new(i32::MIN, i32::MAX)];
        let result = sequential().match_trajectory(&points, &grid, None);
        assert_eq!(result.similarity, -1);
        assert_eq!(result.point_count, 2);
        assert!(!result.is_match());
    }

    #[test]
    fn test_centroid_truncates() {
        let ends = [GridCoord::new(0, 0), GridCoord::new(1, 3)];
        let (position, distance) = centroid_and_spread(&ends, 0.1);
        assert_eq!(position, GridCoord::new(0, 1));
        assert_relative_eq!(distance, (0.25f64 + 2.25).sqrt() * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_roi_outside_grid_fails() {
        let mut grid = OccupancyGrid::new(10, 10);
        grid.set(3, 3, true);
        let roi = Roi::new(GridCoord::new(500, 500), 5);
        let result = sequential().match_trajectory(&[GridCoord::ZERO], &grid, Some(roi));
        assert!(!result.is_match());
    }

    #[test]
    fn test_stride_skips_offsets() {
        // Only reachable at column 1, which stride 3 never visits
        let mut grid = OccupancyGrid::new(3, 6);
        grid.set(0, 1, true);
        let result = sequential().match_trajectory(&[GridCoord::ZERO], &grid, None);
        assert!(!result.is_match());

        let exhaustive = BitCorrelationMatcher::new(MatcherConfig::exhaustive());
        let result = exhaustive.match_trajectory(&[GridCoord::ZERO], &grid, None);
        assert_eq!(result.position, Some(GridCoord::new(0, 1)));
    }

    #[test]
    fn test_wide_footprint_crossing_blocks() {
        let path: Vec<GridCoord> = (0..100).map(|y| GridCoord::new(0, y)).collect();
        let mut grid = OccupancyGrid::new(4, 300);
        for y in 0..100 {
            grid.set(3, 99 + y, true);
        }
        let result = sequential().match_trajectory(&path, &grid, None);
        assert_eq!(result.similarity, 100);
        assert_eq!(result.offsets, vec![GridCoord::new(3, 99)]);
    }
}
