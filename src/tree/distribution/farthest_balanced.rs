//! Farthest-first balanced distribution.
//!
//! Entries are visited by decreasing `max(dist1, dist2)`, so outliers are
//! placed while both sides still have room and ambiguous entries near both
//! routing objects come last. Each side is capped at `ceil(n / 2)` entries.

use super::{Assignments, seed_assignments};
use crate::tree::entry::MTreeEntry;
use std::cmp::Ordering;

pub(crate) fn distribute<E: MTreeEntry + Clone>(
    entries: &[E],
    routing1: usize,
    dist1: &[f64],
    routing2: usize,
    dist2: &[f64],
) -> Assignments<E> {
    let num = entries.len();
    let mut assignments = seed_assignments(entries, routing1, dist1, routing2, dist2);

    let mut order: Vec<usize> = (0..num)
        .filter(|&i| i != routing1 && i != routing2)
        .collect();
    let farthest = |i: usize| dist1[i].max(dist2[i]);
    order.sort_by(|&a, &b| {
        farthest(b)
            .partial_cmp(&farthest(a))
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let half = num.div_ceil(2);
    for i in order {
        let (len1, len2) = (assignments.first().len(), assignments.second().len());
        let to_first = if len1 >= half {
            false
        } else if len2 >= half {
            true
        } else if dist1[i] != dist2[i] {
            dist1[i] < dist2[i]
        } else {
            len1 <= len2
        };
        if to_first {
            assignments.add_to_first(entries[i].clone(), dist1[i], i);
        } else {
            assignments.add_to_second(entries[i].clone(), dist2[i], i);
        }
    }
    assignments
}
