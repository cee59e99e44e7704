//! Core types shared by the grid, planner and codec.

mod cell;
mod coord;
mod strategy;

pub use cell::{CLEARANCE_UNSET, COST_UNREACHABLE, Cell};
pub use coord::GridCoord;
pub use strategy::FieldStrategy;
