//! Circular obstacles.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;
use crate::error::{MargaError, Result};

/// A disc obstacle: every cell whose center lies within `radius` of
/// `center` (Euclidean, inclusive) is occupied once rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: GridCoord,
    pub radius: i32,
}

impl Obstacle {
    /// Create an obstacle, rejecting non-positive radii.
    pub fn new(row: i32, col: i32, radius: i32) -> Result<Self> {
        if radius <= 0 {
            return Err(MargaError::InvalidRadius { row, col, radius });
        }
        Ok(Self {
            center: GridCoord::new(row, col),
            radius,
        })
    }

    /// Does the obstacle cover this cell?
    #[inline]
    pub fn covers(&self, coord: GridCoord) -> bool {
        self.center.distance(&coord) <= self.radius as f64
    }

    /// Cells of a `rows x cols` grid covered by the obstacle.
    pub fn cells_within(
        &self,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = GridCoord> + use<> {
        self.center.disc_within(self.radius, rows, cols)
    }

    /// Does the obstacle cover at least one cell of a `rows x cols` grid?
    #[inline]
    pub fn touches(&self, rows: usize, cols: usize) -> bool {
        self.center.disc_touches(self.radius, rows, cols)
    }
}
