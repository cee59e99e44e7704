//! Goal-cost field: exact obstacle-avoiding distance to the goal.
//!
//! Edges follow the 8-connected adjacency with Euclidean weights (1 for
//! orthogonal steps, sqrt(2) for diagonal ones). Occupied cells are never
//! entered, so cells walled off from the goal keep [`COST_UNREACHABLE`].
//! Because the field is the true cost-to-go, using it as the A* heuristic
//! keeps the search optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use tracing::debug;

use crate::core::{COST_UNREACHABLE, FieldStrategy, GridCoord};
use crate::error::{MargaError, Result};
use crate::grid::{Neighbors, OccupancyGrid};

/// Heap entry for Dijkstra.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    cost: f64,
    index: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.index == other.index
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Builds the goal-cost field into a grid's cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct CostFieldBuilder {
    strategy: FieldStrategy,
}

impl CostFieldBuilder {
    pub fn new(strategy: FieldStrategy) -> Self {
        Self { strategy }
    }

    /// Write `goal_cost` for every cell of `grid`, measured to `goal`.
    ///
    /// Returns the number of cells that can reach the goal (the goal included).
    pub fn build(&self, grid: &mut OccupancyGrid, goal: GridCoord) -> Result<usize> {
        let goal_idx = grid.index_of(goal).ok_or(MargaError::OutOfBounds {
            what: "Goal",
            row: goal.row,
            col: goal.col,
        })?;

        let occupied = grid.occupancy();
        let field = compute_goal_cost(
            &occupied,
            grid.neighbor_table(),
            grid.cols(),
            goal_idx,
            self.strategy,
        );

        let mut reachable = 0;
        for (cell, cost) in grid.cells_mut().iter_mut().zip(field) {
            if cost.is_finite() {
                reachable += 1;
            }
            cell.goal_cost = cost;
        }

        debug!(
            "[CostField] goal={} reachable={}/{} strategy={:?}",
            goal,
            reachable,
            grid.len(),
            self.strategy
        );
        Ok(reachable)
    }
}

/// Euclidean length of the edge between two adjacent cells.
#[inline]
pub(crate) fn step_cost(a: usize, b: usize, cols: usize) -> f64 {
    if a / cols == b / cols || a % cols == b % cols {
        1.0
    } else {
        SQRT_2
    }
}

/// Compute the goal-cost field.
///
/// The goal is seeded with 0 even if it is occupied; propagation only ever
/// enters free cells.
pub(crate) fn compute_goal_cost(
    occupied: &[bool],
    neighbors: &[Neighbors],
    cols: usize,
    goal: usize,
    strategy: FieldStrategy,
) -> Vec<f64> {
    match strategy {
        FieldStrategy::Queue => goal_cost_dijkstra(occupied, neighbors, cols, goal),
        FieldStrategy::Fixpoint => goal_cost_fixpoint(occupied, neighbors, cols, goal),
    }
}

fn goal_cost_dijkstra(
    occupied: &[bool],
    neighbors: &[Neighbors],
    cols: usize,
    goal: usize,
) -> Vec<f64> {
    let mut cost = vec![COST_UNREACHABLE; occupied.len()];
    let mut heap = BinaryHeap::new();

    cost[goal] = 0.0;
    heap.push(FrontierEntry {
        cost: 0.0,
        index: goal,
    });

    while let Some(FrontierEntry { cost: c, index }) = heap.pop() {
        // Stale entry
        if c > cost[index] {
            continue;
        }
        for &n in neighbors[index].as_slice() {
            if occupied[n] {
                continue;
            }
            let candidate = c + step_cost(index, n, cols);
            if candidate < cost[n] {
                cost[n] = candidate;
                heap.push(FrontierEntry {
                    cost: candidate,
                    index: n,
                });
            }
        }
    }

    cost
}

fn goal_cost_fixpoint(
    occupied: &[bool],
    neighbors: &[Neighbors],
    cols: usize,
    goal: usize,
) -> Vec<f64> {
    let mut cost = vec![COST_UNREACHABLE; occupied.len()];
    cost[goal] = 0.0;

    let mut changed = true;
    while changed {
        changed = false;
        for idx in 0..occupied.len() {
            if idx == goal || occupied[idx] {
                continue;
            }
            let mut best = cost[idx];
            for &n in neighbors[idx].as_slice() {
                if cost[n].is_finite() {
                    best = best.min(cost[n] + step_cost(idx, n, cols));
                }
            }
            if best < cost[idx] {
                cost[idx] = best;
                changed = true;
            }
        }
    }

    cost
}
