//! Path planning over an occupancy grid.
//!
//! - [`CostFieldBuilder`]: exact obstacle-avoiding distance to the goal,
//!   used as the search heuristic
//! - [`Planner`]: A* (or Dijkstra) search that only moves the robot where
//!   its whole footprint fits
//!
//! # Example
//!
//! ```
//! use marga::{GridCoord, OccupancyGrid, Planner, PlannerConfig};
//!
//! let mut grid = OccupancyGrid::new(5, 5).unwrap();
//! grid.add_obstacle(2, 2, 1).unwrap();
//! grid.rasterize_obstacles();
//!
//! let mut planner = Planner::new(
//!     &mut grid,
//!     GridCoord::new(0, 0),
//!     GridCoord::new(4, 4),
//!     PlannerConfig::default(),
//! )
//! .unwrap();
//!
//! let outcome = planner.search().unwrap();
//! assert!(outcome.is_found());
//! ```

mod cost_field;
mod planner;
mod types;

pub use cost_field::CostFieldBuilder;
pub use planner::Planner;
pub use types::{
    Path, PlanState, PlannerConfig, SearchAlgorithm, SearchObserver, SearchOutcome,
};
