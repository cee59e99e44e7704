//! Grid persistence.
//!
//! See [`grid_format`] for the byte layouts.

mod codec;
pub mod grid_format;

pub use grid_format::{Format, load_grid, read_grid, save_grid, write_grid};
