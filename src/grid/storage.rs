//! Occupancy grid storage.
//!
//! Cells live in one flat row-major array. Adjacency and search-tree parents
//! are indices into that array, so the grid is the only owner of cell state.

use tracing::debug;

use crate::core::{Cell, FieldStrategy, GridCoord};
use crate::error::{MargaError, Result};

use super::clearance::compute_clearance;
use super::obstacle::Obstacle;
use super::snapshot::GridSnapshot;

/// Row/column offsets of the 8-connected neighborhood, in linking order.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Fixed-capacity neighbor list of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Neighbors {
    indices: [usize; 8],
    len: u8,
}

impl Neighbors {
    #[inline]
    fn push(&mut self, index: usize) {
        self.indices[self.len as usize] = index;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len as usize]
    }
}

/// Occupancy grid: a `rows x cols` matrix of cells plus the obstacles
/// added so far.
///
/// Obstacles are append-only and rasterization never frees a cell, so
/// occupancy only grows over the grid's lifetime.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    neighbors: Vec<Neighbors>,
    obstacles: Vec<Obstacle>,
    field_strategy: FieldStrategy,
}

impl OccupancyGrid {
    /// Create an obstacle-free grid.
    ///
    /// Fails with [`MargaError::InvalidDimension`] unless both sizes are positive.
    pub fn new(rows: i32, cols: i32) -> Result<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(MargaError::InvalidDimension { rows, cols });
        }
        let (rows, cols) = (rows as usize, cols as usize);

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(GridCoord::new(row as i32, col as i32)));
            }
        }

        let mut grid = Self {
            rows,
            cols,
            cells,
            neighbors: Vec::new(),
            obstacles: Vec::new(),
            field_strategy: FieldStrategy::default(),
        };
        grid.link_neighbors();
        Ok(grid)
    }

    /// Use a different propagation strategy for the clearance field.
    pub fn with_field_strategy(mut self, strategy: FieldStrategy) -> Self {
        self.field_strategy = strategy;
        self
    }

    /// Build the static 8-connected adjacency.
    ///
    /// Boundary cells get fewer neighbors; there is no wraparound.
    pub(crate) fn link_neighbors(&mut self) {
        let mut neighbors = vec![Neighbors::default(); self.cells.len()];
        for (idx, slot) in neighbors.iter_mut().enumerate() {
            let coord = self.coord_of(idx);
            for &(dr, dc) in &NEIGHBOR_OFFSETS {
                if let Some(n) = coord.offset(dr, dc).and_then(|c| self.index_of(c)) {
                    slot.push(n);
                }
            }
        }
        self.neighbors = neighbors;
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Propagation strategy used for the clearance field
    #[inline]
    pub fn field_strategy(&self) -> FieldStrategy {
        self.field_strategy
    }

    /// Check if a coordinate lies inside the grid
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
    }

    /// Convert a coordinate to its row-major index
    #[inline]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row as usize * self.cols + coord.col as usize)
        } else {
            None
        }
    }

    /// Convert a row-major index back to a coordinate
    #[inline]
    pub fn coord_of(&self, index: usize) -> GridCoord {
        GridCoord::new((index / self.cols) as i32, (index % self.cols) as i32)
    }

    /// Cell at a coordinate
    #[inline]
    pub fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    /// Cell at a row-major index. Panics if out of range.
    #[inline]
    pub fn cell_at(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// All cells in row-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cell_at_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Row-major indices of the 8-connected neighbors of a cell
    #[inline]
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors[index].as_slice()
    }

    #[inline]
    pub(crate) fn neighbor_table(&self) -> &[Neighbors] {
        &self.neighbors
    }

    /// Occupancy flags in row-major order
    pub fn occupancy(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.occupied).collect()
    }

    /// Obstacles added so far, in insertion order
    #[inline]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Record an obstacle for the next [`rasterize_obstacles`](Self::rasterize_obstacles).
    ///
    /// Fails with [`MargaError::InvalidRadius`] for a non-positive radius and
    /// with [`MargaError::OutOfBounds`] if no cell of the disc lies inside the
    /// grid. Partial overlap with the boundary is accepted.
    pub fn add_obstacle(&mut self, row: i32, col: i32, radius: i32) -> Result<()> {
        let obstacle = Obstacle::new(row, col, radius)?;

        if !obstacle.touches(self.rows, self.cols) {
            debug!(
                "[Grid] Rejected obstacle at ({}, {}) r={}: fully outside {}x{}",
                row, col, radius, self.rows, self.cols
            );
            return Err(MargaError::OutOfBounds {
                what: "Obstacle",
                row,
                col,
            });
        }

        self.obstacles.push(obstacle);
        Ok(())
    }

    /// Mark every in-bounds cell covered by a stored obstacle as occupied,
    /// then recompute the clearance field.
    ///
    /// Returns the number of newly occupied cells.
    pub fn rasterize_obstacles(&mut self) -> usize {
        let mut newly_occupied = 0;

        for i in 0..self.obstacles.len() {
            let obstacle = self.obstacles[i];
            for coord in obstacle.cells_within(self.rows, self.cols) {
                let idx = coord.row as usize * self.cols + coord.col as usize;
                let cell = &mut self.cells[idx];
                if !cell.occupied {
                    cell.occupied = true;
                    cell.clearance = 0;
                    newly_occupied += 1;
                }
            }
        }

        self.update_clearance();

        debug!(
            "[Grid] Rasterized {} obstacles: {} new occupied cells",
            self.obstacles.len(),
            newly_occupied
        );
        newly_occupied
    }

    /// Recompute the clearance field from the current occupancy.
    pub fn update_clearance(&mut self) {
        let occupied = self.occupancy();
        let clearance = compute_clearance(&occupied, &self.neighbors, self.field_strategy);
        for (cell, value) in self.cells.iter_mut().zip(clearance) {
            cell.clearance = value;
        }
    }

    /// Clear all planner-written state: goal costs, scores, parents and
    /// role flags. Occupancy, clearance and obstacles are kept.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.reset_search_state();
        }
    }

    /// Read-only view of the whole grid for renderers and observers
    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot::new(self.rows, self.cols, &self.cells)
    }

    pub(crate) fn restore_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CLEARANCE_UNSET;

    fn coord(row: i32, col: i32) -> GridCoord {
        GridCoord::new(row, col)
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(matches!(
            OccupancyGrid::new(0, 5),
            Err(MargaError::InvalidDimension { rows: 0, cols: 5 })
        ));
        assert!(OccupancyGrid::new(5, -1).is_err());
        assert!(OccupancyGrid::new(1, 1).is_ok());
    }

    #[test]
    fn test_neighbor_counts() {
        let grid = OccupancyGrid::new(4, 5).unwrap();
        let count = |r, c| grid.neighbors(grid.index_of(coord(r, c)).unwrap()).len();

        assert_eq!(count(0, 0), 3);
        assert_eq!(count(3, 4), 3);
        assert_eq!(count(0, 2), 5);
        assert_eq!(count(2, 0), 5);
        assert_eq!(count(1, 1), 8);
        assert_eq!(count(2, 3), 8);
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = OccupancyGrid::new(1, 1).unwrap();
        assert!(grid.neighbors(0).is_empty());
    }

    #[test]
    fn test_neighbors_are_adjacent_and_distinct() {
        let grid = OccupancyGrid::new(6, 7).unwrap();
        for idx in 0..grid.len() {
            let here = grid.coord_of(idx);
            let ns = grid.neighbors(idx);
            for &n in ns {
                assert_ne!(n, idx);
                assert_eq!(here.chebyshev_distance(&grid.coord_of(n)), 1);
            }
            let mut sorted = ns.to_vec();
            sorted.dedup();
            assert_eq!(sorted.len(), ns.len());
        }
    }

    #[test]
    fn test_index_round_trip() {
        let grid = OccupancyGrid::new(3, 7).unwrap();
        for idx in 0..grid.len() {
            assert_eq!(grid.index_of(grid.coord_of(idx)), Some(idx));
            assert_eq!(grid.cell_at(idx).coord, grid.coord_of(idx));
        }
        assert_eq!(grid.index_of(coord(-1, 0)), None);
        assert_eq!(grid.index_of(coord(0, 7)), None);
    }

    #[test]
    fn test_add_obstacle_validation() {
        let mut grid = OccupancyGrid::new(10, 10).unwrap();

        assert!(matches!(
            grid.add_obstacle(5, 5, 0),
            Err(MargaError::InvalidRadius { .. })
        ));
        assert!(matches!(
            grid.add_obstacle(20, 20, 3),
            Err(MargaError::OutOfBounds { .. })
        ));
        // (-2, 5) with radius 2 touches (0, 5)
        assert!(grid.add_obstacle(-2, 5, 2).is_ok());
        // (-2, -2) with radius 2: nearest cell (0, 0) is sqrt(8) away
        assert!(grid.add_obstacle(-2, -2, 2).is_err());

        assert_eq!(grid.obstacles().len(), 1);
    }

    #[test]
    fn test_add_obstacle_extreme_centers() {
        let mut grid = OccupancyGrid::new(10, 10).unwrap();
        for (row, col) in [(i32::MAX, 0), (0, i32::MAX), (i32::MIN, i32::MIN), (i32::MAX, i32::MIN)] {
            assert!(matches!(
                grid.add_obstacle(row, col, 1),
                Err(MargaError::OutOfBounds { .. })
            ));
            assert!(matches!(
                grid.add_obstacle(row, col, i32::MAX / 2),
                Err(MargaError::OutOfBounds { .. })
            ));
        }
        assert!(grid.obstacles().is_empty());

        // Far off-grid, but the radius spans the gap to (9, 0)
        grid.add_obstacle(i32::MAX, 0, i32::MAX - 9).unwrap();
        grid.rasterize_obstacles();
        assert!(grid.cell(coord(9, 0)).unwrap().occupied);
    }

    #[test]
    fn test_huge_radius_covers_whole_grid() {
        let mut grid = OccupancyGrid::new(10, 10).unwrap();
        grid.add_obstacle(5, 5, i32::MAX).unwrap();
        assert_eq!(grid.rasterize_obstacles(), 100);
        assert!(grid.cells().iter().all(|c| c.occupied && c.clearance == 0));
    }

    #[test]
    fn test_add_obstacle_defers_rasterization() {
        let mut grid = OccupancyGrid::new(5, 5).unwrap();
        grid.add_obstacle(2, 2, 1).unwrap();
        assert!(!grid.cell(coord(2, 2)).unwrap().occupied);

        assert_eq!(grid.rasterize_obstacles(), 5);
        assert!(grid.cell(coord(2, 2)).unwrap().occupied);
        assert!(grid.cell(coord(1, 2)).unwrap().occupied);
        assert!(!grid.cell(coord(1, 1)).unwrap().occupied);
    }

    #[test]
    fn test_rasterize_is_idempotent() {
        let mut grid = OccupancyGrid::new(8, 8).unwrap();
        grid.add_obstacle(3, 3, 2).unwrap();
        let first = grid.rasterize_obstacles();
        let before: Vec<_> = grid.cells().to_vec();

        assert_eq!(grid.rasterize_obstacles(), 0);
        assert_eq!(grid.cells(), before.as_slice());
        assert!(first > 0);
    }

    #[test]
    fn test_overlapping_obstacles_keep_occupancy() {
        let mut grid = OccupancyGrid::new(10, 10).unwrap();
        grid.add_obstacle(4, 4, 2).unwrap();
        grid.rasterize_obstacles();
        let occupied_before = grid.occupancy();

        grid.add_obstacle(5, 5, 1).unwrap();
        grid.rasterize_obstacles();

        for (before, after) in occupied_before.iter().zip(grid.occupancy()) {
            assert!(!before || after);
        }
    }

    #[test]
    fn test_clearance_small_grid() {
        let mut grid = OccupancyGrid::new(5, 5).unwrap();
        grid.add_obstacle(0, 0, 1).unwrap();
        grid.rasterize_obstacles();

        let clearance = |r, c| grid.cell(coord(r, c)).unwrap().clearance;
        assert_eq!(clearance(0, 0), 0);
        assert_eq!(clearance(0, 1), 0);
        assert_eq!(clearance(1, 1), 1);
        assert_eq!(clearance(0, 2), 1);
        assert_eq!(clearance(2, 2), 2);
        assert_eq!(clearance(4, 4), 4);
    }

    #[test]
    fn test_clearance_unset_without_obstacles() {
        let mut grid = OccupancyGrid::new(3, 3).unwrap();
        grid.rasterize_obstacles();
        assert!(grid.cells().iter().all(|c| c.clearance == CLEARANCE_UNSET));
    }

    #[test]
    fn test_fixpoint_matches_brushfire() {
        let mut queue = OccupancyGrid::new(12, 9).unwrap();
        let mut fixpoint = OccupancyGrid::new(12, 9)
            .unwrap()
            .with_field_strategy(FieldStrategy::Fixpoint);

        for grid in [&mut queue, &mut fixpoint] {
            grid.add_obstacle(2, 2, 1).unwrap();
            grid.add_obstacle(9, 6, 2).unwrap();
            grid.add_obstacle(-1, 8, 2).unwrap();
            grid.rasterize_obstacles();
        }

        let a: Vec<_> = queue.cells().iter().map(|c| c.clearance).collect();
        let b: Vec<_> = fixpoint.cells().iter().map(|c| c.clearance).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reset_search_state_keeps_static_fields() {
        let mut grid = OccupancyGrid::new(4, 4).unwrap();
        grid.add_obstacle(1, 1, 1).unwrap();
        grid.rasterize_obstacles();
        let before = grid.cells().to_vec();

        {
            let cell = grid.cell_at_mut(15);
            cell.g_score = 3.0;
            cell.parent = Some(14);
            cell.is_on_best_path = true;
            cell.goal_cost = 1.5;
        }
        grid.reset_search_state();

        assert_eq!(grid.cells(), before.as_slice());
    }
}
