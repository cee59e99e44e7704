//! Binary grid persistence.
//!
//! Both formats store the grid size, every cell's state in row-major order
//! and the obstacle list. Adjacency is never stored; it is rebuilt when a
//! grid is constructed on load.
//!
//! Native format (`.mrga`):
//! - Magic `"MRGA"` (4 bytes), version `u8`
//! - `rows: i32`, `cols: i32`
//! - Per cell: `row: i32`, `col: i32`, `occupied: u8`, `clearance: i32`,
//!   five role flags (`u8` each: start, end, robot, on-path, best-path),
//!   `goal_cost: f64`, `g_score: f64`, `f_score: f64`,
//!   `parent: i32` (row-major index, -1 for none)
//! - `obstacle_count: u64`, then per obstacle `row: i32`, `col: i32`,
//!   `radius: i32`
//!
//! Legacy format: the same layout without magic and version. Its parent
//! field is a presence marker (-1 absent, 1 present) followed by the full
//! record of the parent cell, recursively. Those nested records are
//! consumed and discarded on read, so loaded legacy cells have no parent.
//!
//! All integers and floats are little-endian.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::core::{Cell, GridCoord};
use crate::error::{MargaError, Result};
use crate::grid::{Obstacle, OccupancyGrid};

use super::codec::{
    read_bool, read_f64_le, read_i32_le, read_u8, read_u64_le, write_bool, write_f64_le,
    write_i32_le, write_u8, write_u64_le,
};

/// Magic bytes of the native format
const MAGIC: &[u8; 4] = b"MRGA";

/// Current native format version
const VERSION: u8 = 1;

/// Parent marker for "no parent"
const NO_PARENT: i32 = -1;

/// Legacy parent marker for "parent record follows"
const LEGACY_PARENT_PRESENT: i32 = 1;

/// Upper bound on `rows * cols` accepted from a stream.
const MAX_CELLS: u64 = 1 << 28;

/// Records reserved up front, before the stream proves it holds more.
const PREALLOC_RECORDS: usize = 4096;

/// On-disk layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Versioned format with in-grid parent indices
    #[default]
    Native,
    /// Headerless format with recursive parent records
    Legacy,
}

/// Save a grid to a file.
pub fn save_grid(grid: &OccupancyGrid, path: &Path, format: Format) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_grid(grid, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Load a grid from a file.
pub fn load_grid(path: &Path, format: Format) -> Result<OccupancyGrid> {
    let file = File::open(path)?;
    read_grid(&mut BufReader::new(file), format)
}

/// Write a grid to any writer.
pub fn write_grid<W: Write>(grid: &OccupancyGrid, writer: &mut W, format: Format) -> Result<()> {
    let w: &mut dyn Write = writer;

    if format == Format::Native {
        w.write_all(MAGIC)?;
        write_u8(w, VERSION)?;
    }

    write_i32_le(w, grid.rows() as i32)?;
    write_i32_le(w, grid.cols() as i32)?;

    for cell in grid.cells() {
        match format {
            Format::Native => {
                let parent = cell.parent.map_or(NO_PARENT, |p| p as i32);
                write_cell_record(w, cell, parent)?;
            }
            Format::Legacy => write_legacy_chain(w, grid, cell)?,
        }
    }

    let obstacles = grid.obstacles();
    write_u64_le(w, obstacles.len() as u64)?;
    for obstacle in obstacles {
        write_i32_le(w, obstacle.center.row)?;
        write_i32_le(w, obstacle.center.col)?;
        write_i32_le(w, obstacle.radius)?;
    }

    debug!(
        "[GridFormat] wrote {}x{} grid ({:?}, {} obstacles)",
        grid.rows(),
        grid.cols(),
        format,
        obstacles.len()
    );
    Ok(())
}

/// Read a grid from any reader.
///
/// Fails with [`MargaError::CorruptData`] on a bad header, non-positive or
/// oversized dimensions, cell coordinates that do not match their slot,
/// parent indices outside the grid, clearance values inconsistent with the
/// stored occupancy, invalid obstacles or a truncated stream.
pub fn read_grid<R: Read>(reader: &mut R, format: Format) -> Result<OccupancyGrid> {
    let r: &mut dyn Read = reader;

    if format == Format::Native {
        read_header(r)?;
    }

    let rows = read_i32_le(r)?;
    let cols = read_i32_le(r)?;
    if rows <= 0 || cols <= 0 || (rows as u64) * (cols as u64) > MAX_CELLS {
        return Err(MargaError::CorruptData(format!(
            "invalid grid dimensions {rows}x{cols}"
        )));
    }

    let cols_usize = cols as usize;
    let len = rows as usize * cols_usize;

    // Records are buffered as they arrive, so a stream that claims a huge
    // grid but ends early fails before the grid is allocated
    let mut records = Vec::with_capacity(len.min(PREALLOC_RECORDS));
    for idx in 0..len {
        let expected = GridCoord::new((idx / cols_usize) as i32, (idx % cols_usize) as i32);
        let record = read_cell_record(r)?;
        if record.coord != expected {
            return Err(MargaError::CorruptData(format!(
                "cell {} found where {} was expected",
                record.coord, expected
            )));
        }

        let parent = match format {
            Format::Native => match record.parent {
                NO_PARENT => None,
                p if p >= 0 && (p as usize) < len => Some(p as usize),
                p => {
                    return Err(MargaError::CorruptData(format!(
                        "parent index {p} of {expected} outside the grid"
                    )));
                }
            },
            Format::Legacy => {
                if record.parent != NO_PARENT {
                    skip_legacy_parents(r, len)?;
                }
                None
            }
        };
        records.push((record, parent));
    }

    let mut grid = OccupancyGrid::new(rows, cols)?;
    for (idx, (record, parent)) in records.iter().enumerate() {
        let cell = grid.cell_at_mut(idx);
        record.apply(cell);
        cell.parent = *parent;
    }

    // Clearance is a function of occupancy; stored values must agree with it
    grid.update_clearance();
    for (cell, (record, _)) in grid.cells().iter().zip(&records) {
        if cell.clearance != record.clearance {
            return Err(MargaError::CorruptData(format!(
                "clearance {} of {} disagrees with occupancy (expected {})",
                record.clearance, cell.coord, cell.clearance
            )));
        }
    }

    let count = read_u64_le(r)?;
    let mut obstacles = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let row = read_i32_le(r)?;
        let col = read_i32_le(r)?;
        let radius = read_i32_le(r)?;
        let obstacle = Obstacle::new(row, col, radius)
            .map_err(|e| MargaError::CorruptData(format!("obstacle: {e}")))?;
        obstacles.push(obstacle);
    }
    grid.restore_obstacles(obstacles);

    debug!(
        "[GridFormat] read {}x{} grid ({:?}, {} obstacles)",
        rows, cols, format, count
    );
    Ok(grid)
}

fn read_header(r: &mut dyn Read) -> Result<()> {
    let mut magic = [0u8; 4];
    for byte in &mut magic {
        *byte = read_u8(r)?;
    }
    if &magic != MAGIC {
        return Err(MargaError::CorruptData(format!(
            "bad magic {:?}, expected {:?}",
            magic, MAGIC
        )));
    }

    let version = read_u8(r)?;
    if version != VERSION {
        return Err(MargaError::CorruptData(format!(
            "unsupported format version {version}, expected {VERSION}"
        )));
    }
    Ok(())
}

/// Decoded cell record, before it is placed into the grid.
struct CellRecord {
    coord: GridCoord,
    occupied: bool,
    clearance: i32,
    is_start: bool,
    is_end: bool,
    is_robot: bool,
    is_on_path: bool,
    is_on_best_path: bool,
    goal_cost: f64,
    g_score: f64,
    f_score: f64,
    parent: i32,
}

impl CellRecord {
    /// Copy everything but the parent and clearance into a grid cell.
    fn apply(&self, cell: &mut Cell) {
        cell.occupied = self.occupied;
        cell.is_start = self.is_start;
        cell.is_end = self.is_end;
        cell.is_robot = self.is_robot;
        cell.is_on_path = self.is_on_path;
        cell.is_on_best_path = self.is_on_best_path;
        cell.goal_cost = self.goal_cost;
        cell.g_score = self.g_score;
        cell.f_score = self.f_score;
    }
}

fn write_cell_record(w: &mut dyn Write, cell: &Cell, parent: i32) -> Result<()> {
    write_i32_le(w, cell.coord.row)?;
    write_i32_le(w, cell.coord.col)?;
    write_bool(w, cell.occupied)?;
    write_i32_le(w, cell.clearance)?;
    write_bool(w, cell.is_start)?;
    write_bool(w, cell.is_end)?;
    write_bool(w, cell.is_robot)?;
    write_bool(w, cell.is_on_path)?;
    write_bool(w, cell.is_on_best_path)?;
    write_f64_le(w, cell.goal_cost)?;
    write_f64_le(w, cell.g_score)?;
    write_f64_le(w, cell.f_score)?;
    write_i32_le(w, parent)
}

fn read_cell_record(r: &mut dyn Read) -> Result<CellRecord> {
    Ok(CellRecord {
        coord: GridCoord::new(read_i32_le(r)?, read_i32_le(r)?),
        occupied: read_bool(r)?,
        clearance: read_i32_le(r)?,
        is_start: read_bool(r)?,
        is_end: read_bool(r)?,
        is_robot: read_bool(r)?,
        is_on_path: read_bool(r)?,
        is_on_best_path: read_bool(r)?,
        goal_cost: read_f64_le(r)?,
        g_score: read_f64_le(r)?,
        f_score: read_f64_le(r)?,
        parent: read_i32_le(r)?,
    })
}

/// Write a cell followed by the records of its whole parent chain.
fn write_legacy_chain(w: &mut dyn Write, grid: &OccupancyGrid, cell: &Cell) -> Result<()> {
    let mut current = cell;
    // Parent chains are acyclic, so they never exceed the grid size
    for _ in 0..grid.len() {
        match current.parent {
            Some(parent) => {
                write_cell_record(w, current, LEGACY_PARENT_PRESENT)?;
                current = grid.cell_at(parent);
            }
            None => break,
        }
    }
    write_cell_record(w, current, NO_PARENT)
}

/// Consume nested legacy parent records until one without a parent.
fn skip_legacy_parents(r: &mut dyn Read, limit: usize) -> Result<()> {
    for _ in 0..limit {
        let record = read_cell_record(r)?;
        if record.parent == NO_PARENT {
            return Ok(());
        }
    }
    Err(MargaError::CorruptData(
        "parent chain longer than the grid".into(),
    ))
}
