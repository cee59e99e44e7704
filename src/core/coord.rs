//! Grid coordinates and disc geometry.

use serde::{Deserialize, Serialize};

/// Integer cell coordinate: `row` indexes the first grid axis, `col` the second.
///
/// Coordinates are signed so that callers can describe positions outside the
/// grid (obstacle centers may sit off-grid, and invalid start/end positions
/// must be reportable rather than unrepresentable).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: i32,
    pub col: i32,
}

impl GridCoord {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Euclidean distance between cell centers.
    #[inline]
    pub fn distance(&self, other: &GridCoord) -> f64 {
        let dr = (self.row as i64 - other.row as i64) as f64;
        let dc = (self.col as i64 - other.col as i64) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// Chebyshev (8-connected hop) distance, saturating at `i32::MAX`.
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        let dr = (self.row as i64 - other.row as i64).abs();
        let dc = (self.col as i64 - other.col as i64).abs();
        dr.max(dc).min(i32::MAX as i64) as i32
    }

    /// Offset by a row/column delta, `None` on overflow.
    #[inline]
    pub fn offset(&self, dr: i32, dc: i32) -> Option<GridCoord> {
        Some(GridCoord::new(
            self.row.checked_add(dr)?,
            self.col.checked_add(dc)?,
        ))
    }

    /// Cells of the closed disc of `radius` around this coordinate that lie
    /// inside a `rows x cols` grid.
    ///
    /// A cell belongs to the disc when the Euclidean distance between cell
    /// centers is `<= radius`. Only the grid-clipped bounding box is visited,
    /// so the cost is bounded by the grid size whatever the radius or center.
    pub fn disc_within(
        &self,
        radius: i32,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = GridCoord> + use<> {
        let (cr, cc) = (self.row as i64, self.col as i64);
        let r = radius.max(0) as i64;
        let limit = r * r;

        let row_lo = (cr - r).max(0);
        let row_hi = (cr + r).min(rows as i64 - 1);
        let col_lo = (cc - r).max(0);
        let col_hi = (cc + r).min(cols as i64 - 1);

        // Inside the box both deltas are at most `r < 2^31`, so the squared
        // sum fits in i64
        (row_lo..=row_hi).flat_map(move |row| {
            (col_lo..=col_hi).filter_map(move |col| {
                let (dr, dc) = (row - cr, col - cc);
                (dr * dr + dc * dc <= limit).then(|| GridCoord::new(row as i32, col as i32))
            })
        })
    }

    /// Does the disc of `radius` around this coordinate reach any cell of a
    /// `rows x cols` grid?
    ///
    /// Tests the in-bounds cell nearest to the center, which is the center
    /// clamped to the grid on each axis.
    pub fn disc_touches(&self, radius: i32, rows: usize, cols: usize) -> bool {
        if radius < 0 || rows == 0 || cols == 0 {
            return false;
        }
        let r = radius as i64;
        let (cr, cc) = (self.row as i64, self.col as i64);
        let dr = (cr - cr.clamp(0, rows as i64 - 1)).abs();
        let dc = (cc - cc.clamp(0, cols as i64 - 1)).abs();
        dr <= r && dc <= r && dr * dr + dc * dc <= r * r
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((row, col): (i32, i32)) -> Self {
        GridCoord::new(row, col)
    }
}
