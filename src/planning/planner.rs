//! Clearance-aware A* planner.
//!
//! The planner binds to a grid's own cells, builds the goal-cost field once at
//! construction and then searches the 8-connected adjacency. A neighbor is
//! only entered when the whole robot footprint fits: its clearance must
//! strictly exceed the robot radius and the footprint must stay inside the
//! grid.

use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::core::GridCoord;
use crate::error::{MargaError, Result};
use crate::grid::OccupancyGrid;

use super::cost_field::{CostFieldBuilder, step_cost};
use super::types::{
    OpenEntry, Path, PlanState, PlannerConfig, SearchAlgorithm, SearchObserver, SearchOutcome,
};

/// A* planner over an occupancy grid.
pub struct Planner<'g> {
    grid: &'g mut OccupancyGrid,
    config: PlannerConfig,
    start: usize,
    end: usize,
    robot: Option<usize>,
    path: Vec<GridCoord>,
    state: PlanState,
}

impl<'g> Planner<'g> {
    /// Bind a planner to `grid`.
    ///
    /// Clears any search state left on the grid, marks start and end, places
    /// the robot footprint at the start and builds the goal-cost field.
    ///
    /// Fails with [`MargaError::OutOfBounds`] for positions outside the grid,
    /// [`MargaError::InvalidRadius`] for a negative robot radius and
    /// [`MargaError::ObstacleCollision`] if the footprint at the start
    /// overlaps an occupied cell.
    pub fn new(
        grid: &'g mut OccupancyGrid,
        start: GridCoord,
        end: GridCoord,
        config: PlannerConfig,
    ) -> Result<Self> {
        let start_idx = grid.index_of(start).ok_or(MargaError::OutOfBounds {
            what: "Start",
            row: start.row,
            col: start.col,
        })?;
        let end_idx = grid.index_of(end).ok_or(MargaError::OutOfBounds {
            what: "End",
            row: end.row,
            col: end.col,
        })?;
        if config.robot_radius < 0 {
            return Err(MargaError::InvalidRadius {
                row: start.row,
                col: start.col,
                radius: config.robot_radius,
            });
        }

        if let Some(hit) = footprint_collision(grid, start, config.robot_radius) {
            return Err(MargaError::ObstacleCollision {
                row: hit.row,
                col: hit.col,
            });
        }

        grid.reset_search_state();
        grid.cell_at_mut(start_idx).is_start = true;
        grid.cell_at_mut(end_idx).is_end = true;

        let mut planner = Self {
            grid,
            config,
            start: start_idx,
            end: end_idx,
            robot: None,
            path: Vec::new(),
            state: PlanState::Unplanned,
        };
        planner.move_robot(start_idx)?;

        CostFieldBuilder::new(planner.config.field_strategy).build(planner.grid, end)?;

        debug!(
            "[Planner] bound: start={} end={} radius={} algorithm={:?}",
            start, end, planner.config.robot_radius, planner.config.algorithm
        );
        Ok(planner)
    }

    /// Current lifecycle state
    #[inline]
    pub fn state(&self) -> PlanState {
        self.state
    }

    /// The grid this planner is bound to
    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        self.grid
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    pub fn start(&self) -> GridCoord {
        self.grid.coord_of(self.start)
    }

    #[inline]
    pub fn end(&self) -> GridCoord {
        self.grid.coord_of(self.end)
    }

    #[inline]
    pub fn robot_radius(&self) -> i32 {
        self.config.robot_radius
    }

    /// Center of the robot footprint
    pub fn robot_position(&self) -> Option<GridCoord> {
        self.robot.map(|i| self.grid.coord_of(i))
    }

    /// Path of the last successful search, empty otherwise
    #[inline]
    pub fn path(&self) -> &[GridCoord] {
        &self.path
    }

    /// Move the robot footprint to `coord`.
    ///
    /// The new footprint (disc of the robot radius, clipped to the grid) must
    /// be obstacle-free, otherwise [`MargaError::ObstacleCollision`] is
    /// returned and nothing changes. On success the old footprint loses
    /// `is_robot` and every cell of the new one gains `is_robot` and
    /// `is_on_path`.
    pub fn place_robot(&mut self, coord: GridCoord) -> Result<()> {
        let idx = self.grid.index_of(coord).ok_or(MargaError::OutOfBounds {
            what: "Robot",
            row: coord.row,
            col: coord.col,
        })?;
        self.move_robot(idx)
    }

    fn move_robot(&mut self, idx: usize) -> Result<()> {
        let radius = self.config.robot_radius;
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let center = self.grid.coord_of(idx);

        if let Some(hit) = footprint_collision(self.grid, center, radius) {
            return Err(MargaError::ObstacleCollision {
                row: hit.row,
                col: hit.col,
            });
        }

        if let Some(old) = self.robot {
            for coord in self.grid.coord_of(old).disc_within(radius, rows, cols) {
                let i = coord.row as usize * cols + coord.col as usize;
                self.grid.cell_at_mut(i).is_robot = false;
            }
        }

        for coord in center.disc_within(radius, rows, cols) {
            let cell = self.grid.cell_at_mut(coord.row as usize * cols + coord.col as usize);
            cell.is_robot = true;
            cell.is_on_path = true;
        }

        self.robot = Some(idx);
        Ok(())
    }

    /// Run the search without an observer.
    pub fn search(&mut self) -> Result<SearchOutcome> {
        self.run(None)
    }

    /// Run the search, handing a snapshot to `observer` after every robot
    /// move and once more when a path is found.
    pub fn search_with<O: SearchObserver>(&mut self, observer: &mut O) -> Result<SearchOutcome> {
        self.run(Some(observer))
    }

    fn run(&mut self, mut observer: Option<&mut dyn SearchObserver>) -> Result<SearchOutcome> {
        self.begin_search()?;

        let n = self.grid.len();
        let cols = self.grid.cols();
        let radius = self.config.robot_radius;

        let mut open_set = BinaryHeap::new();
        let mut in_open = vec![false; n];
        let mut closed = vec![false; n];
        let mut seq_of = vec![0u64; n];
        let mut next_seq = 0u64;

        {
            let start = self.grid.cell_at_mut(self.start);
            start.g_score = 0.0;
            start.f_score = 0.0;
        }
        in_open[self.start] = true;
        seq_of[self.start] = next_seq;
        open_set.push(OpenEntry {
            f_score: 0.0,
            seq: next_seq,
            index: self.start,
        });
        next_seq += 1;

        let mut expanded = 0;

        while let Some(entry) = open_set.pop() {
            let current = entry.index;
            // Superseded by a cheaper entry for the same cell
            if !in_open[current] || entry.f_score > self.grid.cell_at(current).f_score {
                continue;
            }
            in_open[current] = false;
            closed[current] = true;
            expanded += 1;

            self.move_robot(current)?;
            self.emit(&mut observer);

            if current == self.end {
                let path = self.reconstruct_path(expanded);
                self.emit(&mut observer);
                self.state = PlanState::Found;
                debug!(
                    "[Planner] SUCCESS: {} cells, cost={:.3}, expanded={}",
                    path.len(),
                    path.cost(),
                    expanded
                );
                return Ok(SearchOutcome::Found(path));
            }

            let current_g = self.grid.cell_at(current).g_score;
            trace!(
                "[Planner] expand {} g={:.3}",
                self.grid.coord_of(current),
                current_g
            );

            let neighbors: Vec<usize> = self.grid.neighbors(current).to_vec();
            for neighbor in neighbors {
                if closed[neighbor] || !self.footprint_fits(neighbor) {
                    continue;
                }

                let tentative_g = current_g + step_cost(current, neighbor, cols);
                let heuristic = match self.config.algorithm {
                    SearchAlgorithm::AStar => self.grid.cell_at(neighbor).goal_cost,
                    SearchAlgorithm::Dijkstra => 0.0,
                };

                let seq = if !in_open[neighbor] {
                    in_open[neighbor] = true;
                    seq_of[neighbor] = next_seq;
                    next_seq += 1;
                    seq_of[neighbor]
                } else if tentative_g < self.grid.cell_at(neighbor).g_score {
                    seq_of[neighbor]
                } else {
                    continue;
                };

                let cell = self.grid.cell_at_mut(neighbor);
                cell.g_score = tentative_g;
                cell.f_score = tentative_g + heuristic;
                cell.parent = Some(current);
                open_set.push(OpenEntry {
                    f_score: cell.f_score,
                    seq,
                    index: neighbor,
                });
            }
        }

        self.state = PlanState::Exhausted;
        debug!(
            "[Planner] NotFound: open set exhausted after {} expansions (radius={})",
            expanded, radius
        );
        Ok(SearchOutcome::NotFound { expanded })
    }

    /// Reset per-search state so repeated searches start from scratch.
    fn begin_search(&mut self) -> Result<()> {
        for cell in self.grid.cells_mut() {
            cell.g_score = 0.0;
            cell.f_score = 0.0;
            cell.parent = None;
            cell.is_robot = false;
            cell.is_on_path = false;
            cell.is_on_best_path = false;
        }
        self.path.clear();
        self.robot = None;
        self.state = PlanState::Searching;
        self.move_robot(self.start)
    }

    /// Can the robot footprint be centered on this cell?
    fn footprint_fits(&self, idx: usize) -> bool {
        let cell = self.grid.cell_at(idx);
        let radius = self.config.robot_radius;
        if cell.occupied || cell.clearance <= radius {
            return false;
        }

        let (row, col, r) = (cell.coord.row as i64, cell.coord.col as i64, radius as i64);
        row - r >= 0
            && col - r >= 0
            && row + r < self.grid.rows() as i64
            && col + r < self.grid.cols() as i64
    }

    /// Walk parents from end to start, marking the best path.
    fn reconstruct_path(&mut self, expanded: usize) -> Path {
        let mut cells = Vec::new();
        let mut current = self.end;

        // A parent chain never revisits a cell, so it is at most grid-sized
        for _ in 0..self.grid.len() {
            let cell = self.grid.cell_at_mut(current);
            cell.is_on_best_path = true;
            cells.push(cell.coord);

            if current == self.start {
                break;
            }
            match cell.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        cells.reverse();

        let cost = self.grid.cell_at(self.end).g_score;
        self.path = cells.clone();
        Path::new(cells, cost, expanded)
    }

    fn emit(&self, observer: &mut Option<&mut dyn SearchObserver>) {
        if let Some(obs) = observer.as_deref_mut() {
            obs.on_snapshot(&self.grid.snapshot());
            if !self.config.frame_delay.is_zero() {
                std::thread::sleep(self.config.frame_delay);
            }
        }
    }
}

/// First occupied cell under the footprint of `radius` centered on `center`.
fn footprint_collision(grid: &OccupancyGrid, center: GridCoord, radius: i32) -> Option<GridCoord> {
    center
        .disc_within(radius, grid.rows(), grid.cols())
        .map(|c| grid.cell_at(c.row as usize * grid.cols() + c.col as usize))
        .find(|cell| cell.occupied)
        .map(|cell| cell.coord)
}
