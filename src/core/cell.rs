//! Cell record for the occupancy grid.

use super::coord::GridCoord;

/// Clearance value of a cell with no occupied cell reachable.
pub const CLEARANCE_UNSET: i32 = i32::MAX;

/// Goal cost of a cell the goal cannot be reached from.
pub const COST_UNREACHABLE: f64 = f64::INFINITY;

/// A single cell in the grid with static and search state.
///
/// Static state (`occupied`, `clearance`) is owned by the grid and written by
/// obstacle rasterization. Search state (`goal_cost`, scores, `parent` and the
/// role flags) is written by the planner and cleared by
/// [`OccupancyGrid::reset_search_state`](crate::grid::OccupancyGrid::reset_search_state).
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Position of this cell in the grid
    pub coord: GridCoord,

    /// Covered by at least one obstacle. Never cleared once set.
    pub occupied: bool,

    /// Hop distance (8-connected) to the nearest occupied cell.
    /// - 0 for occupied cells
    /// - [`CLEARANCE_UNSET`] when the grid has no obstacles
    pub clearance: i32,

    /// Shortest obstacle-avoiding distance to the goal
    pub goal_cost: f64,

    /// Cost from start (valid during/after a search)
    pub g_score: f64,

    /// g_score + heuristic
    pub f_score: f64,

    /// Row-major index of the search-tree parent
    pub parent: Option<usize>,

    pub is_start: bool,
    pub is_end: bool,
    /// Inside the robot footprint at its current position
    pub is_robot: bool,
    /// Covered by the robot footprint at some point during the search
    pub is_on_path: bool,
    /// Part of the reconstructed path
    pub is_on_best_path: bool,
}

impl Cell {
    /// Create a free, unvisited cell.
    pub fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            occupied: false,
            clearance: CLEARANCE_UNSET,
            goal_cost: COST_UNREACHABLE,
            g_score: 0.0,
            f_score: 0.0,
            parent: None,
            is_start: false,
            is_end: false,
            is_robot: false,
            is_on_path: false,
            is_on_best_path: false,
        }
    }

    /// Is the goal reachable from this cell?
    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.goal_cost.is_finite()
    }

    /// Has the clearance field assigned a finite value?
    #[inline]
    pub fn has_clearance(&self) -> bool {
        self.clearance != CLEARANCE_UNSET
    }

    /// Clear everything a planner writes, keeping occupancy and clearance.
    pub(crate) fn reset_search_state(&mut self) {
        self.goal_cost = COST_UNREACHABLE;
        self.g_score = 0.0;
        self.f_score = 0.0;
        self.parent = None;
        self.is_start = false;
        self.is_end = false;
        self.is_robot = false;
        self.is_on_path = false;
        self.is_on_best_path = false;
    }
}
