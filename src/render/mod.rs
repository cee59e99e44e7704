//! Text rendering of grid snapshots.
//!
//! The renderer only reads a [`GridSnapshot`]; it never touches the grid or
//! the planner. Each cell is drawn in a fixed-width column and colored by
//! its most important role.

use std::fmt::Write;

use crate::core::Cell;
use crate::grid::GridSnapshot;

const RESET: &str = "\x1b[0m";

/// Width of one rendered cell column
const CELL_WIDTH: usize = 6;

/// What each cell shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RenderView {
    /// 1 for occupied cells and the robot footprint, 0 elsewhere
    #[default]
    Binary,
    /// Hop distance to the nearest obstacle (`INF` when unset)
    Clearance,
    /// Distance to the goal (`INF` when unreachable)
    GoalCost,
}

impl RenderView {
    fn title(&self) -> &'static str {
        match self {
            RenderView::Binary => "Binary Map:",
            RenderView::Clearance => "Distance Map:",
            RenderView::GoalCost => "Goal Cost Map:",
        }
    }

    fn value(&self, cell: &Cell) -> String {
        match self {
            RenderView::Binary => {
                if cell.occupied || cell.is_robot {
                    "1".into()
                } else {
                    "0".into()
                }
            }
            RenderView::Clearance => {
                if cell.has_clearance() {
                    cell.clearance.to_string()
                } else {
                    "INF".into()
                }
            }
            RenderView::GoalCost => {
                if cell.is_reachable() {
                    format!("{:.1}", cell.goal_cost)
                } else {
                    "INF".into()
                }
            }
        }
    }
}

/// Display role of a cell, highest priority first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    Occupied,
    Start,
    End,
    Robot,
    BestPath,
    Path,
    Free,
}

impl CellRole {
    pub fn of(cell: &Cell) -> Self {
        if cell.occupied {
            CellRole::Occupied
        } else if cell.is_start {
            CellRole::Start
        } else if cell.is_end {
            CellRole::End
        } else if cell.is_robot {
            CellRole::Robot
        } else if cell.is_on_best_path {
            CellRole::BestPath
        } else if cell.is_on_path {
            CellRole::Path
        } else {
            CellRole::Free
        }
    }

    /// ANSI color code for this role
    pub fn color_code(&self) -> &'static str {
        match self {
            CellRole::Occupied => "\x1b[31m", // Red
            CellRole::Start => "\x1b[34m",    // Blue
            CellRole::End => "\x1b[32m",      // Green
            CellRole::Robot => "\x1b[33m",    // Yellow
            CellRole::BestPath => "\x1b[35m", // Magenta
            CellRole::Path => "\x1b[36m",     // Cyan
            CellRole::Free => RESET,
        }
    }
}

/// Renders snapshots as ANSI-colored (or plain) text.
#[derive(Clone, Copy, Debug)]
pub struct AnsiRenderer {
    color: bool,
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self { color: true }
    }
}

impl AnsiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text output without escape codes
    pub fn without_color() -> Self {
        Self { color: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render one view of a snapshot, with row labels and a column ruler.
    pub fn render(&self, snapshot: &GridSnapshot<'_>, view: RenderView) -> String {
        let mut out = String::new();
        out.push_str(view.title());
        out.push('\n');

        for row in 0..snapshot.rows() {
            let _ = write!(out, "{:>2}| ", row);
            for cell in snapshot.row(row).unwrap_or_default() {
                if self.color {
                    out.push_str(CellRole::of(cell).color_code());
                }
                let _ = write!(out, "{:>width$}", view.value(cell), width = CELL_WIDTH);
            }
            if self.color {
                out.push_str(RESET);
            }
            out.push('\n');
        }

        out.push_str("  +");
        for _ in 0..snapshot.cols() {
            out.push_str("   ---");
        }
        out.push_str("\n  ");
        for col in 0..snapshot.cols() {
            let _ = write!(out, "{:>width$}", col, width = CELL_WIDTH);
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridCoord;
    use crate::grid::OccupancyGrid;
    use crate::planning::{Planner, PlannerConfig};

    #[test]
    fn test_plain_binary_view() {
        let mut grid = OccupancyGrid::new(2, 3).unwrap();
        grid.add_obstacle(0, 2, 1).unwrap();
        grid.rasterize_obstacles();

        let text = AnsiRenderer::without_color().render(&grid.snapshot(), RenderView::Binary);
        // (0, 1) is within radius 1 of the center, so it is covered too
        let expected = [
            "Binary Map:",
            " 0|      0     1     1",
            " 1|      0     0     1",
            "  +   ---   ---   ---",
            "       0     1     2",
        ]
        .join("\n")
            + "\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_clearance_view_marks_unset() {
        let grid = OccupancyGrid::new(1, 2).unwrap();
        let text = AnsiRenderer::without_color().render(&grid.snapshot(), RenderView::Clearance);
        assert!(text.contains("   INF   INF"));
    }

    #[test]
    fn test_goal_cost_view() {
        let mut grid = OccupancyGrid::new(1, 3).unwrap();
        Planner::new(
            &mut grid,
            GridCoord::new(0, 0),
            GridCoord::new(0, 2),
            PlannerConfig::default(),
        )
        .unwrap();

        let text = AnsiRenderer::without_color().render(&grid.snapshot(), RenderView::GoalCost);
        assert!(text.contains("   2.0   1.0   0.0"));
    }

    #[test]
    fn test_role_priority_and_colors() {
        let mut cell = Cell::new(GridCoord::new(0, 0));
        cell.is_on_path = true;
        assert_eq!(CellRole::of(&cell), CellRole::Path);
        cell.is_on_best_path = true;
        assert_eq!(CellRole::of(&cell), CellRole::BestPath);
        cell.is_robot = true;
        assert_eq!(CellRole::of(&cell), CellRole::Robot);
        cell.is_start = true;
        assert_eq!(CellRole::of(&cell), CellRole::Start);
        cell.occupied = true;
        assert_eq!(CellRole::of(&cell), CellRole::Occupied);

        let grid = OccupancyGrid::new(1, 1).unwrap();
        let colored = AnsiRenderer::new().render(&grid.snapshot(), RenderView::Binary);
        assert!(colored.contains("\x1b[0m"));
        let plain = AnsiRenderer::without_color().render(&grid.snapshot(), RenderView::Binary);
        assert!(!plain.contains('\x1b'));
    }
}
