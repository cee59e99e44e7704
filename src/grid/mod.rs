//! Occupancy grid implementation.
//!
//! - [`OccupancyGrid`]: flat cell storage, 8-connected adjacency, obstacle
//!   rasterization and the clearance field
//! - [`Obstacle`]: disc obstacles, validated on creation
//! - [`GridSnapshot`]: read-only view consumed by renderers

mod clearance;
mod obstacle;
mod snapshot;
mod storage;

pub use obstacle::Obstacle;
pub use snapshot::GridSnapshot;
pub use storage::OccupancyGrid;

pub(crate) use storage::Neighbors;
