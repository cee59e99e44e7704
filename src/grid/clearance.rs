//! Obstacle-distance (clearance) field.
//!
//! Multi-source hop distance over the 8-connected grid with unit edge cost,
//! seeded from every occupied cell at once. Cells with no occupied cell
//! anywhere in the grid keep [`CLEARANCE_UNSET`].

use std::collections::VecDeque;

use crate::core::{CLEARANCE_UNSET, FieldStrategy};

use super::storage::Neighbors;

/// Compute the clearance of every cell.
pub(crate) fn compute_clearance(
    occupied: &[bool],
    neighbors: &[Neighbors],
    strategy: FieldStrategy,
) -> Vec<i32> {
    match strategy {
        FieldStrategy::Queue => clearance_brushfire(occupied, neighbors),
        FieldStrategy::Fixpoint => clearance_fixpoint(occupied, neighbors),
    }
}

/// Brushfire (BFS) from all occupied cells.
fn clearance_brushfire(occupied: &[bool], neighbors: &[Neighbors]) -> Vec<i32> {
    let mut clearance = vec![CLEARANCE_UNSET; occupied.len()];
    let mut queue = VecDeque::with_capacity(occupied.len() / 4);

    for (idx, _) in occupied.iter().enumerate().filter(|(_, occ)| **occ) {
        clearance[idx] = 0;
        queue.push_back(idx);
    }

    while let Some(idx) = queue.pop_front() {
        let next = clearance[idx] + 1;
        for &n in neighbors[idx].as_slice() {
            if clearance[n] == CLEARANCE_UNSET {
                clearance[n] = next;
                queue.push_back(n);
            }
        }
    }

    clearance
}

/// Full-pass relaxation until no cell changes.
///
/// Terminates after at most grid-diameter + 1 passes: each pass settles at
/// least one more hop ring around the occupied cells.
fn clearance_fixpoint(occupied: &[bool], neighbors: &[Neighbors]) -> Vec<i32> {
    let mut clearance: Vec<i32> = occupied
        .iter()
        .map(|&occ| if occ { 0 } else { CLEARANCE_UNSET })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for idx in 0..occupied.len() {
            if occupied[idx] || clearance[idx] == 1 {
                continue;
            }
            let mut best = clearance[idx];
            for &n in neighbors[idx].as_slice() {
                let candidate = if occupied[n] {
                    1
                } else if clearance[n] != CLEARANCE_UNSET {
                    clearance[n] + 1
                } else {
                    continue;
                };
                best = best.min(candidate);
            }
            if best < clearance[idx] {
                clearance[idx] = best;
                changed = true;
            }
        }
    }

    clearance
}
