//! Balanced distribution.
//!
//! Entries are ranked by distance to each routing object. The two sides then
//! take turns pulling their closest entry not yet taken by either side, so
//! the final sizes differ by at most one.

use super::{Assignments, by_distance, seed_assignments};
use crate::tree::entry::MTreeEntry;

pub(crate) fn distribute<E: MTreeEntry + Clone>(
    entries: &[E],
    routing1: usize,
    dist1: &[f64],
    routing2: usize,
    dist2: &[f64],
) -> Assignments<E> {
    let num = entries.len();
    let mut assignments = seed_assignments(entries, routing1, dist1, routing2, dist2);

    let mut idx1: Vec<usize> = (0..num).collect();
    idx1.sort_by(by_distance(dist1));
    let mut idx2: Vec<usize> = (0..num).collect();
    idx2.sort_by(by_distance(dist2));

    let mut assigned = vec![false; num];
    assigned[routing1] = true;
    assigned[routing2] = true;
    let mut remaining = num - 2;
    let (mut pos1, mut pos2) = (0, 0);

    while remaining > 0 {
        if let Some(i) = next_unassigned(&idx1, &mut pos1, &assigned) {
            assigned[i] = true;
            assignments.add_to_first(entries[i].clone(), dist1[i], i);
            remaining -= 1;
        }
        if remaining == 0 {
            break;
        }
        if let Some(i) = next_unassigned(&idx2, &mut pos2, &assigned) {
            assigned[i] = true;
            assignments.add_to_second(entries[i].clone(), dist2[i], i);
            remaining -= 1;
        }
    }
    assignments
}

/// Advance `pos` past taken entries and return the next free one.
fn next_unassigned(order: &[usize], pos: &mut usize, assigned: &[bool]) -> Option<usize> {
    while *pos < order.len() {
        let i = order[*pos];
        *pos += 1;
        if !assigned[i] {
            return Some(i);
        }
    }
    None
}
