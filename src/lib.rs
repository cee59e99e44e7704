//! # Marga: Grid Motion Planning for Disc Robots
//!
//! Plans collision-free paths for a circular robot on a 2D occupancy grid.
//!
//! ## Features
//!
//! - **Occupancy grid**: flat row-major cell storage with static 8-connected
//!   adjacency and circular obstacles rasterized on demand
//! - **Clearance field**: hop distance from every cell to the nearest obstacle
//! - **Goal-cost field**: exact obstacle-avoiding distance to the goal, used
//!   as an A* heuristic that keeps the search optimal
//! - **Footprint-aware A\***: the robot only moves where its whole disc fits
//! - **Persistence**: versioned binary format plus the older headerless one
//!
//! ## Quick Start
//!
//! ```rust
//! use marga::{GridCoord, OccupancyGrid, Planner, PlannerConfig, SearchOutcome};
//!
//! let mut grid = OccupancyGrid::new(20, 20).unwrap();
//! grid.add_obstacle(10, 10, 3).unwrap();
//! grid.rasterize_obstacles();
//!
//! let mut planner = Planner::new(
//!     &mut grid,
//!     GridCoord::new(1, 1),
//!     GridCoord::new(18, 18),
//!     PlannerConfig::with_radius(1),
//! )
//! .unwrap();
//!
//! match planner.search().unwrap() {
//!     SearchOutcome::Found(path) => println!("{} cells, cost {:.2}", path.len(), path.cost()),
//!     SearchOutcome::NotFound { expanded } => println!("no path after {expanded} expansions"),
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: cell record, coordinates and shared constants
//! - [`grid`]: occupancy grid, obstacles, clearance field and snapshots
//! - [`planning`]: goal-cost field and the planner
//! - [`io`]: binary persistence
//! - [`render`]: text rendering of snapshots
//! - [`config`]: TOML scenario files
//!
//! ## Data Flow
//!
//! ```text
//! OccupancyGrid::new ──► add_obstacle ──► rasterize_obstacles (clearance)
//!                                                 │
//!                        load_grid ───────────────┤
//!                                                 ▼
//!                               Planner::new (goal-cost field)
//!                                                 │
//!                                                 ▼
//!                         search / search_with ──► SearchOutcome
//!                                                 │
//!                                   snapshots ──► AnsiRenderer
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod io;
pub mod planning;
pub mod render;

pub use config::ScenarioConfig;
pub use crate::core::{CLEARANCE_UNSET, COST_UNREACHABLE, Cell, FieldStrategy, GridCoord};
pub use error::{MargaError, Result};
pub use grid::{GridSnapshot, Obstacle, OccupancyGrid};
pub use io::{Format, load_grid, read_grid, save_grid, write_grid};
pub use planning::{
    CostFieldBuilder, Path, PlanState, Planner, PlannerConfig, SearchAlgorithm, SearchObserver,
    SearchOutcome,
};
pub use render::{AnsiRenderer, CellRole, RenderView};
