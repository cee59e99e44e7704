//! Error types for Marga

use thiserror::Error;

/// Marga error type.
///
/// A search that exhausts its open set is not an error; see
/// [`SearchOutcome::NotFound`](crate::planning::SearchOutcome::NotFound).
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("Invalid grid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimension { rows: i32, cols: i32 },

    #[error("Invalid radius {radius} at ({row}, {col})")]
    InvalidRadius { row: i32, col: i32, radius: i32 },

    #[error("{what} at ({row}, {col}) is outside the grid")]
    OutOfBounds {
        what: &'static str,
        row: i32,
        col: i32,
    },

    #[error("Robot footprint touches an obstacle at ({row}, {col})")]
    ObstacleCollision { row: i32, col: i32 },

    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
