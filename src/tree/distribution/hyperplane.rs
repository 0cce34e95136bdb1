//! Generalized hyperplane distribution.
//!
//! Every entry joins the routing object it is closer to, ties go to the
//! smaller side. Produces tight regions but may be arbitrarily skewed.

use super::{Assignments, seed_assignments};
use crate::tree::entry::MTreeEntry;

pub(crate) fn distribute<E: MTreeEntry + Clone>(
    entries: &[E],
    routing1: usize,
    dist1: &[f64],
    routing2: usize,
    dist2: &[f64],
) -> Assignments<E> {
    let mut assignments = seed_assignments(entries, routing1, dist1, routing2, dist2);
    for (i, entry) in entries.iter().enumerate() {
        if i == routing1 || i == routing2 {
            continue;
        }
        let (d1, d2) = (dist1[i], dist2[i]);
        let to_first = if d1 != d2 {
            d1 < d2
        } else {
            assignments.first().len() <= assignments.second().len()
        };
        if to_first {
            assignments.add_to_first(entry.clone(), d1, i);
        } else {
            assignments.add_to_second(entry.clone(), d2, i);
        }
    }
    assignments
}
