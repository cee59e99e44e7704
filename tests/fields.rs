//! Grid structure and distance-field integration tests.
//!
//! Fields are cross-checked against brute-force references on small random
//! grids for both propagation strategies.

mod common;

use approx::assert_relative_eq;
use marga::{CostFieldBuilder, FieldStrategy, GridCoord, MargaError, OccupancyGrid};

// ============================================================================
// Adjacency
// ============================================================================

#[test]
fn test_neighbor_counts_on_every_cell() {
    for (rows, cols) in [(3, 3), (4, 7), (9, 5)] {
        let grid = OccupancyGrid::new(rows, cols).unwrap();
        for idx in 0..grid.len() {
            let c = grid.coord_of(idx);
            let on_row_edge = c.row == 0 || c.row == rows - 1;
            let on_col_edge = c.col == 0 || c.col == cols - 1;
            let expected = match (on_row_edge, on_col_edge) {
                (true, true) => 3,
                (true, false) | (false, true) => 5,
                (false, false) => 8,
            };
            assert_eq!(grid.neighbors(idx).len(), expected, "cell {}", c);

            for &n in grid.neighbors(idx) {
                assert_eq!(grid.coord_of(n).chebyshev_distance(&c), 1);
            }
        }
    }
}

#[test]
fn test_degenerate_grids() {
    let line = OccupancyGrid::new(1, 4).unwrap();
    assert_eq!(line.neighbors(0).len(), 1);
    assert_eq!(line.neighbors(1).len(), 2);

    let single = OccupancyGrid::new(1, 1).unwrap();
    assert!(single.neighbors(0).is_empty());

    for (rows, cols) in [(0, 3), (3, 0), (-1, 2)] {
        assert!(matches!(
            OccupancyGrid::new(rows, cols),
            Err(MargaError::InvalidDimension { .. })
        ));
    }
}

// ============================================================================
// Obstacles
// ============================================================================

#[test]
fn test_obstacle_rejection() {
    let mut grid = OccupancyGrid::new(10, 10).unwrap();
    assert!(matches!(
        grid.add_obstacle(5, 5, 0),
        Err(MargaError::InvalidRadius { .. })
    ));
    assert!(matches!(
        grid.add_obstacle(-5, -5, 2),
        Err(MargaError::OutOfBounds { .. })
    ));
    assert!(matches!(
        grid.add_obstacle(5, 13, 3),
        Err(MargaError::OutOfBounds { .. })
    ));

    // Reaches column 9 from just outside the grid
    grid.add_obstacle(5, 11, 2).unwrap();
    grid.rasterize_obstacles();
    assert!(grid.cell(GridCoord::new(5, 9)).unwrap().occupied);
    assert_eq!(grid.obstacles().len(), 1);
}

#[test]
fn test_occupancy_is_monotone() {
    let mut grid = common::grid_with(12, 12, &[(3, 3, 2)]);
    let before: Vec<bool> = grid.occupancy();

    grid.add_obstacle(8, 8, 2).unwrap();
    grid.rasterize_obstacles();
    for (was, now) in before.iter().zip(grid.occupancy()) {
        assert!(!was || now);
    }

    // Re-rasterizing the same obstacles marks nothing new
    assert_eq!(grid.rasterize_obstacles(), 0);
}

// ============================================================================
// Clearance field
// ============================================================================

#[test]
fn test_clearance_matches_brute_force() {
    for seed in 0..40 {
        let rows = 3 + (seed % 18) as i32;
        let cols = 20 - (seed % 15) as i32;
        let grid = common::random_grid(seed, rows, cols, 6);
        let expected = common::brute_force_clearance(&grid);

        for (cell, want) in grid.cells().iter().zip(&expected) {
            assert_eq!(cell.clearance, *want, "seed {} cell {}", seed, cell.coord);
            assert_eq!(cell.clearance == 0, cell.occupied);
        }
    }
}

#[test]
fn test_clearance_strategies_agree() {
    for seed in 100..130 {
        let queue = common::random_grid(seed, 15, 17, 8);

        let mut fixpoint = OccupancyGrid::new(15, 17)
            .unwrap()
            .with_field_strategy(FieldStrategy::Fixpoint);
        for o in queue.obstacles() {
            fixpoint
                .add_obstacle(o.center.row, o.center.col, o.radius)
                .unwrap();
        }
        fixpoint.rasterize_obstacles();

        for (a, b) in queue.cells().iter().zip(fixpoint.cells()) {
            assert_eq!(a.clearance, b.clearance, "seed {} cell {}", seed, a.coord);
        }
    }
}

// ============================================================================
// Goal-cost field
// ============================================================================

#[test]
fn test_goal_cost_matches_brute_force() {
    for seed in 200..230 {
        let mut grid = common::random_grid(seed, 14, 16, 7);
        let goal = grid.coord_of((seed as usize * 37) % grid.len());
        let expected = common::brute_force_goal_cost(&grid, goal);

        CostFieldBuilder::default().build(&mut grid, goal).unwrap();

        for (cell, want) in grid.cells().iter().zip(&expected) {
            if want.is_finite() {
                assert_relative_eq!(cell.goal_cost, *want, epsilon = 1e-9);
            } else {
                assert!(!cell.is_reachable(), "seed {} cell {}", seed, cell.coord);
            }
        }
        assert_eq!(grid.cell(goal).unwrap().goal_cost, 0.0);
    }
}

#[test]
fn test_goal_cost_strategies_agree() {
    for seed in 300..320 {
        let mut queue = common::random_grid(seed, 12, 12, 6);
        let mut fixpoint = queue.clone();
        let goal = GridCoord::new(11, 0);

        let reachable = CostFieldBuilder::new(FieldStrategy::Queue)
            .build(&mut queue, goal)
            .unwrap();
        let reachable_fixpoint = CostFieldBuilder::new(FieldStrategy::Fixpoint)
            .build(&mut fixpoint, goal)
            .unwrap();
        assert_eq!(reachable, reachable_fixpoint);

        for (a, b) in queue.cells().iter().zip(fixpoint.cells()) {
            assert_relative_eq!(a.goal_cost, b.goal_cost, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_occupied_goal_seeds_field() {
    let mut grid = common::grid_with(7, 7, &[(3, 3, 1)]);
    CostFieldBuilder::default()
        .build(&mut grid, GridCoord::new(3, 3))
        .unwrap();

    // The goal itself is seeded even though it is occupied, but propagation
    // never leaves it through occupied neighbors
    assert_eq!(grid.cell(GridCoord::new(3, 3)).unwrap().goal_cost, 0.0);
    assert!(!grid.cell(GridCoord::new(2, 3)).unwrap().is_reachable());
    assert_relative_eq!(
        grid.cell(GridCoord::new(2, 2)).unwrap().goal_cost,
        std::f64::consts::SQRT_2,
        epsilon = 1e-12
    );
}
