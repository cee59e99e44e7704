//! Test utilities for Marga integration tests.
//!
//! Brute-force reference computations and seeded random scenarios.

#![allow(dead_code)]

use std::f64::consts::SQRT_2;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use marga::{CLEARANCE_UNSET, COST_UNREACHABLE, GridCoord, OccupancyGrid};

/// Build and rasterize a grid from `(row, col, radius)` triples.
pub fn grid_with(rows: i32, cols: i32, obstacles: &[(i32, i32, i32)]) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(rows, cols).unwrap();
    for &(r, c, radius) in obstacles {
        grid.add_obstacle(r, c, radius).unwrap();
    }
    grid.rasterize_obstacles();
    grid
}

/// Random grid of the given size with up to `max_obstacles` in-bounds discs.
pub fn random_grid(seed: u64, rows: i32, cols: i32, max_obstacles: usize) -> OccupancyGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = OccupancyGrid::new(rows, cols).unwrap();
    let count = rng.gen_range(0..=max_obstacles);
    for _ in 0..count {
        let row = rng.gen_range(0..rows);
        let col = rng.gen_range(0..cols);
        let radius = rng.gen_range(1..=2);
        grid.add_obstacle(row, col, radius).unwrap();
    }
    grid.rasterize_obstacles();
    grid
}

/// A random free cell, if the grid has any.
pub fn random_free_cell(grid: &OccupancyGrid, rng: &mut StdRng) -> Option<GridCoord> {
    let free: Vec<GridCoord> = grid
        .cells()
        .iter()
        .filter(|c| !c.occupied)
        .map(|c| c.coord)
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}

/// Hop distance to the nearest occupied cell by scanning every occupied cell.
///
/// Unit-cost 8-connected distance on an open grid is the Chebyshev distance,
/// and the nearest occupied cell is always reachable without crossing another.
pub fn brute_force_clearance(grid: &OccupancyGrid) -> Vec<i32> {
    let occupied: Vec<GridCoord> = grid
        .cells()
        .iter()
        .filter(|c| c.occupied)
        .map(|c| c.coord)
        .collect();

    grid.cells()
        .iter()
        .map(|cell| {
            occupied
                .iter()
                .map(|o| o.chebyshev_distance(&cell.coord))
                .min()
                .unwrap_or(CLEARANCE_UNSET)
        })
        .collect()
}

fn edge_cost(a: GridCoord, b: GridCoord) -> f64 {
    if a.row == b.row || a.col == b.col {
        1.0
    } else {
        SQRT_2
    }
}

/// O(V^2) Dijkstra from `goal` that never enters occupied cells.
pub fn brute_force_goal_cost(grid: &OccupancyGrid, goal: GridCoord) -> Vec<f64> {
    let n = grid.len();
    let mut cost = vec![COST_UNREACHABLE; n];
    let mut done = vec![false; n];
    cost[grid.index_of(goal).unwrap()] = 0.0;

    loop {
        let next = (0..n)
            .filter(|&i| !done[i] && cost[i].is_finite())
            .min_by(|&a, &b| cost[a].total_cmp(&cost[b]));
        let Some(current) = next else {
            break;
        };
        done[current] = true;

        for &neighbor in grid.neighbors(current) {
            if grid.cell_at(neighbor).occupied {
                continue;
            }
            let candidate =
                cost[current] + edge_cost(grid.coord_of(current), grid.coord_of(neighbor));
            if candidate < cost[neighbor] {
                cost[neighbor] = candidate;
            }
        }
    }
    cost
}

/// Can a robot of `radius` be centered on this cell during a search?
pub fn footprint_fits(grid: &OccupancyGrid, coord: GridCoord, radius: i32) -> bool {
    let Some(cell) = grid.cell(coord) else {
        return false;
    };
    !cell.occupied
        && cell.clearance > radius
        && coord.row - radius >= 0
        && coord.col - radius >= 0
        && coord.row + radius < grid.rows() as i32
        && coord.col + radius < grid.cols() as i32
}

/// Cheapest clearance-respecting path cost by Bellman-Ford relaxation over
/// every allowed edge. The start itself is exempt from the footprint rule.
pub fn exhaustive_path_cost(
    grid: &OccupancyGrid,
    start: GridCoord,
    end: GridCoord,
    radius: i32,
) -> Option<f64> {
    let n = grid.len();
    let start_idx = grid.index_of(start).unwrap();
    let end_idx = grid.index_of(end).unwrap();
    let allowed: Vec<bool> = (0..n)
        .map(|i| footprint_fits(grid, grid.coord_of(i), radius))
        .collect();

    let mut cost = vec![f64::INFINITY; n];
    cost[start_idx] = 0.0;

    for _ in 0..n {
        let mut changed = false;
        for from in 0..n {
            if !cost[from].is_finite() {
                continue;
            }
            for &to in grid.neighbors(from) {
                if to == start_idx || !allowed[to] {
                    continue;
                }
                let candidate = cost[from] + edge_cost(grid.coord_of(from), grid.coord_of(to));
                if candidate < cost[to] {
                    cost[to] = candidate;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    cost[end_idx].is_finite().then_some(cost[end_idx])
}

/// Check the structural rules every returned path must satisfy.
pub fn assert_valid_path(grid: &OccupancyGrid, cells: &[GridCoord], radius: i32) {
    assert!(!cells.is_empty(), "path is empty");
    for pair in cells.windows(2) {
        assert_eq!(
            pair[0].chebyshev_distance(&pair[1]),
            1,
            "{} and {} are not neighbors",
            pair[0],
            pair[1]
        );
    }
    for coord in &cells[1..] {
        assert!(
            footprint_fits(grid, *coord, radius),
            "footprint of radius {} does not fit at {}",
            radius,
            coord
        );
    }
}

/// Sum of Euclidean step lengths along a path.
pub fn path_length(cells: &[GridCoord]) -> f64 {
    cells.windows(2).map(|p| edge_cost(p[0], p[1])).sum()
}
