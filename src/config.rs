//! Scenario configuration loading.
//!
//! A scenario file describes one planning problem:
//!
//! ```toml
//! [grid]
//! rows = 20
//! cols = 30
//!
//! [[obstacles]]
//! row = 10
//! col = 12
//! radius = 3
//!
//! [robot]
//! start = { row = 1, col = 1 }
//! end = { row = 18, col = 27 }
//! radius = 1
//!
//! [search]
//! algorithm = "astar"
//! visualize = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{FieldStrategy, GridCoord};
use crate::error::{MargaError, Result};
use crate::grid::OccupancyGrid;
use crate::planning::{PlannerConfig, SearchAlgorithm};

/// Main scenario structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub grid: GridConfig,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
    pub robot: RobotConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Grid dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: i32,
    pub cols: i32,
}

/// One disc obstacle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub row: i32,
    pub col: i32,
    pub radius: i32,
}

/// Robot placement and footprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub start: GridCoord,
    pub end: GridCoord,

    /// Footprint radius in cells (default: 0, a point robot)
    #[serde(default)]
    pub radius: i32,
}

/// Search settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search heuristic (default: astar)
    #[serde(default)]
    pub algorithm: SearchAlgorithm,

    /// Field propagation strategy (default: queue)
    #[serde(default)]
    pub field_strategy: FieldStrategy,

    /// Print a snapshot after every robot move (default: false)
    #[serde(default)]
    pub visualize: bool,

    /// Pause between snapshots in milliseconds (default: 200)
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: SearchAlgorithm::default(),
            field_strategy: FieldStrategy::default(),
            visualize: false,
            frame_delay_ms: default_frame_delay_ms(),
        }
    }
}

fn default_frame_delay_ms() -> u64 {
    200
}

impl ScenarioConfig {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read scenario file: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse a scenario from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Construct the grid, add every obstacle and rasterize them.
    ///
    /// Validation errors surface exactly as from [`OccupancyGrid`] itself.
    pub fn build_grid(&self) -> Result<OccupancyGrid> {
        let mut grid = OccupancyGrid::new(self.grid.rows, self.grid.cols)?
            .with_field_strategy(self.search.field_strategy);
        for obstacle in &self.obstacles {
            grid.add_obstacle(obstacle.row, obstacle.col, obstacle.radius)?;
        }
        grid.rasterize_obstacles();
        Ok(grid)
    }

    /// Runtime planner settings for this scenario
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig::with_radius(self.robot.radius)
            .with_algorithm(self.search.algorithm)
            .with_field_strategy(self.search.field_strategy)
            .with_frame_delay(Duration::from_millis(self.search.frame_delay_ms))
    }
}
