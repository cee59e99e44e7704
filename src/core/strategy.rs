//! Propagation strategy for the distance fields.

use serde::{Deserialize, Serialize};

/// How the clearance and goal-cost fields are propagated.
///
/// Both strategies produce identical fields:
/// - `Queue`: FIFO BFS (clearance) and binary-heap Dijkstra (goal cost)
/// - `Fixpoint`: repeated full-grid relaxation passes until nothing changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStrategy {
    #[default]
    Queue,
    Fixpoint,
}
