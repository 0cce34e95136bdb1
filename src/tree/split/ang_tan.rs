//! Ang and Tan's linear split.
//!
//! Every entry is assigned, per axis, to the side of the node's bounding box
//! whose edge it is closer to. The axis with the most even distribution
//! wins; ties are broken by the overlap of the two resulting groups and then
//! by the extent of the axis.
//!
//! Reference: C. H. Ang and T. C. Tan, "New Linear Node Splitting Algorithm
//! for R-trees", SSD 1997.

use super::SplitAssignment;
use crate::compute::spatial::{center, overlap, union_where};
use proxima_types::bbox::{HyperBoundingBox, SpatialComparable};
use rand::Rng;
use std::cmp::Ordering;

/// Candidate distribution along one axis.
struct AxisCandidate {
    axis: usize,
    assignment: SplitAssignment,
    card: usize,
    overlap: f64,
    extent: f64,
}

pub fn split<S: SpatialComparable>(entries: &[S], min_entries: usize) -> SplitAssignment {
    split_with_rng(entries, min_entries, &mut rand::thread_rng())
}

/// Like [`split`], drawing from `rng` when no axis separates the entries.
pub fn split_with_rng<S, G>(entries: &[S], min_entries: usize, rng: &mut G) -> SplitAssignment
where
    S: SpatialComparable,
    G: Rng + ?Sized,
{
    let num = entries.len();
    let Some(total) = HyperBoundingBox::union_of(entries) else {
        return SplitAssignment::new(num);
    };

    let mut best: Option<AxisCandidate> = None;
    for d in 0..total.dimensionality() {
        let assignment = SplitAssignment::from_second(
            num,
            (0..num).filter(|&i| {
                let e = &entries[i];
                e.min(d) - total.min(d) >= total.max(d) - e.max(d)
            }),
        );
        let second = assignment.second_len();
        if second == 0 || second == num {
            continue;
        }
        let card = second.max(num - second);
        let candidate = AxisCandidate {
            axis: d,
            overlap: group_overlap(entries, &assignment),
            extent: total.extent(d),
            assignment,
            card,
        };
        let better = match &best {
            None => true,
            Some(b) => compare(&candidate, b) == Ordering::Less,
        };
        if better {
            best = Some(candidate);
        }
    }

    match best {
        Some(candidate) => {
            let AxisCandidate {
                axis,
                mut assignment,
                ..
            } = candidate;
            rebalance(entries, &total, axis, min_entries, &mut assignment);
            assignment
        }
        None => {
            log::warn!(
                "Ang-Tan split of {} entries found no separating axis; splitting at random",
                num
            );
            SplitAssignment::from_second(num, rand::seq::index::sample(rng, num, num / 2).into_iter())
        }
    }
}

/// Smaller is better: most even, then least overlap, then narrowest axis.
fn compare(a: &AxisCandidate, b: &AxisCandidate) -> Ordering {
    a.card
        .cmp(&b.card)
        .then(a.overlap.partial_cmp(&b.overlap).unwrap_or(Ordering::Equal))
        .then(a.extent.partial_cmp(&b.extent).unwrap_or(Ordering::Equal))
}

fn group_overlap<S: SpatialComparable>(entries: &[S], assignment: &SplitAssignment) -> f64 {
    let first = union_where(entries, |i| !assignment.is_second(i));
    let second = union_where(entries, |i| assignment.is_second(i));
    match (first, second) {
        (Some(a), Some(b)) => overlap(&a, &b),
        _ => 0.0,
    }
}

/// Move the entries closest to the other side until both groups hold at
/// least `min_entries`.
fn rebalance<S: SpatialComparable>(
    entries: &[S],
    total: &HyperBoundingBox,
    axis: usize,
    min_entries: usize,
    assignment: &mut SplitAssignment,
) {
    let mid = center(total, axis);
    let position = |i: usize| center(&entries[i], axis) - mid;

    while assignment.first_len() < min_entries {
        // Second-group entry lying lowest along the axis.
        let Some(i) = assignment.second_indices().min_by(|&a, &b| {
            position(a).partial_cmp(&position(b)).unwrap_or(Ordering::Equal)
        }) else {
            return;
        };
        assignment.set_first(i);
    }
    while assignment.second_len() < min_entries {
        let Some(i) = assignment.first_indices().max_by(|&a, &b| {
            position(a).partial_cmp(&position(b)).unwrap_or(Ordering::Equal)
        }) else {
            return;
        };
        assignment.set_second(i);
    }
}
