//! Planner types.

use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{FieldStrategy, GridCoord};
use crate::grid::GridSnapshot;

/// Which heuristic drives the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgorithm {
    /// Goal-cost field as heuristic
    #[default]
    #[value(name = "astar")]
    AStar,
    /// Zero heuristic (f = g)
    Dijkstra,
}

/// Planner configuration
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Robot footprint radius in cells (0 = point robot)
    pub robot_radius: i32,
    /// Heuristic used by the search loop
    pub algorithm: SearchAlgorithm,
    /// Propagation strategy for the goal-cost field
    pub field_strategy: FieldStrategy,
    /// Pause after each observer snapshot (cosmetic pacing only)
    pub frame_delay: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            robot_radius: 0,
            algorithm: SearchAlgorithm::AStar,
            field_strategy: FieldStrategy::Queue,
            frame_delay: Duration::ZERO,
        }
    }
}

impl PlannerConfig {
    /// Create with a robot radius and defaults for everything else
    pub fn with_radius(robot_radius: i32) -> Self {
        Self {
            robot_radius,
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: SearchAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_field_strategy(mut self, strategy: FieldStrategy) -> Self {
        self.field_strategy = strategy;
        self
    }

    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }
}

/// Lifecycle of a planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanState {
    /// Constructed, no search run yet
    Unplanned,
    /// Search loop running
    Searching,
    /// Terminal: path populated
    Found,
    /// Terminal: open set exhausted, no path
    Exhausted,
}

/// A path from start to end, both inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    cells: Vec<GridCoord>,
    cost: f64,
    expanded: usize,
}

impl Path {
    pub(super) fn new(cells: Vec<GridCoord>, cost: f64, expanded: usize) -> Self {
        Self {
            cells,
            cost,
            expanded,
        }
    }

    /// Cells from start to end
    #[inline]
    pub fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    /// Number of cells, start and end included
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of Euclidean step lengths
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Cells expanded by the search that produced this path
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

/// Result of a completed search.
///
/// `NotFound` is a normal outcome, distinct from every [`MargaError`](crate::MargaError).
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found(Path),
    NotFound { expanded: usize },
}

impl SearchOutcome {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// The path, if one was found
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound { .. } => None,
        }
    }

    /// Cells expanded during the search
    pub fn expanded(&self) -> usize {
        match self {
            SearchOutcome::Found(path) => path.expanded(),
            SearchOutcome::NotFound { expanded } => *expanded,
        }
    }
}

/// Receives grid snapshots while a search runs.
pub trait SearchObserver {
    fn on_snapshot(&mut self, snapshot: &GridSnapshot<'_>);
}

impl<F> SearchObserver for F
where
    F: FnMut(&GridSnapshot<'_>),
{
    fn on_snapshot(&mut self, snapshot: &GridSnapshot<'_>) {
        self(snapshot)
    }
}

/// Open-set entry.
///
/// `seq` is assigned when a cell first enters the open set and survives
/// later g-score improvements, so equal f-scores pop in insertion order.
#[derive(Clone, Copy, Debug)]
pub(super) struct OpenEntry {
    pub f_score: f64,
    pub seq: u64,
    pub index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
