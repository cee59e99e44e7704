//! Read-only grid snapshot handed to renderers and search observers.

use crate::core::{Cell, GridCoord};

/// Borrowed view of every cell's role flags and numeric fields.
#[derive(Clone, Copy, Debug)]
pub struct GridSnapshot<'a> {
    rows: usize,
    cols: usize,
    cells: &'a [Cell],
}

impl<'a> GridSnapshot<'a> {
    pub(crate) fn new(rows: usize, cols: usize, cells: &'a [Cell]) -> Self {
        Self { rows, cols, cells }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col), `None` when outside the grid
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&'a Cell> {
        if row < self.rows && col < self.cols {
            Some(&self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Cell at a coordinate
    #[inline]
    pub fn cell(&self, coord: GridCoord) -> Option<&'a Cell> {
        if coord.row < 0 || coord.col < 0 {
            return None;
        }
        self.get(coord.row as usize, coord.col as usize)
    }

    /// Cells of one row, left to right, `None` when outside the grid
    pub fn row(&self, row: usize) -> Option<&'a [Cell]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// All cells in row-major order
    #[inline]
    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// Coordinates of cells currently covered by the robot footprint
    pub fn robot_cells(&self) -> impl Iterator<Item = GridCoord> + 'a {
        self.cells.iter().filter(|c| c.is_robot).map(|c| c.coord)
    }
}
