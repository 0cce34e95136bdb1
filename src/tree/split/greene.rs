//! Greene's split.
//!
//! Picks the seeds quadratically (the pair wasting the most volume when put
//! into one box), chooses the axis along which the seeds are best separated,
//! then cuts the entries sorted by their lower edge on that axis in half.
//!
//! Reference: D. Greene, "An Implementation and Performance Analysis of
//! Spatial Data Access Methods", ICDE 1989.

use super::SplitAssignment;
use crate::compute::spatial::{enlargement, union_where, volume, volume_union};
use proxima_types::bbox::SpatialComparable;
use std::cmp::Ordering;

pub fn split<S: SpatialComparable>(entries: &[S], _min_entries: usize) -> SplitAssignment {
    let num = entries.len();
    let (w1, w2) = pick_seeds(entries);
    let axis = separation_axis(&entries[w1], &entries[w2]);

    let mut order: Vec<usize> = (0..num).collect();
    order.sort_by(|&a, &b| {
        entries[a]
            .min(axis)
            .partial_cmp(&entries[b].min(axis))
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let half = num / 2;
    let mut assignment = SplitAssignment::from_second(num, order[num - half..].iter().copied());
    if num % 2 == 1 {
        // The median goes wherever it enlarges the box less.
        let median = order[half];
        let lower = union_where(entries, |i| order[..half].contains(&i));
        let upper = union_where(entries, |i| assignment.is_second(i));
        if let (Some(lower), Some(upper)) = (lower, upper) {
            let inc1 = enlargement(&lower, &entries[median]);
            let inc2 = enlargement(&upper, &entries[median]);
            if inc2 < inc1 {
                assignment.set_second(median);
            }
        }
    }
    assignment
}

/// Quadratic seed picking: the pair maximizing
/// `volume(a ∪ b) - volume(a) - volume(b)`.
fn pick_seeds<S: SpatialComparable>(entries: &[S]) -> (usize, usize) {
    let volumes: Vec<f64> = entries.iter().map(|e| volume(e)).collect();
    let mut best = (0, 1);
    let mut worst_waste = f64::NEG_INFINITY;
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let waste = volume_union(&entries[i], &entries[j]) - volumes[i] - volumes[j];
            if waste > worst_waste {
                worst_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// Axis with the largest normalized separation between the two seeds.
/// Ties go to the larger unnormalized gap; axes on which both seeds are
/// flat are skipped. Falls back to axis 0.
fn separation_axis<S: SpatialComparable>(m1: &S, m2: &S) -> usize {
    let mut axis = 0;
    let (mut best_sep, mut best_gap) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for d in 0..m1.dimensionality() {
        let span = m1.max(d).max(m2.max(d)) - m1.min(d).min(m2.min(d));
        if span <= 0.0 {
            continue;
        }
        let gap = (m1.min(d) - m2.max(d)).max(m2.min(d) - m1.max(d));
        let sep = gap / span;
        if sep > best_sep || (sep == best_sep && gap > best_gap) {
            axis = d;
            best_sep = sep;
            best_gap = gap;
        }
    }
    axis
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxima_types::HyperBoundingBox;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> HyperBoundingBox {
        HyperBoundingBox::new(vec![x0, y0], vec![x1, y1])
    }

    #[test]
    fn test_seeds_waste_the_most() {
        let entries = vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 1.0, 2.0, 2.0),
            rect(9.0, 9.0, 10.0, 10.0),
        ];
        assert_eq!(pick_seeds(&entries), (0, 2));
    }

    #[test]
    fn test_axis_follows_separation() {
        // Separated along y, overlapping along x.
        let a = rect(0.0, 0.0, 4.0, 1.0);
        let b = rect(1.0, 5.0, 5.0, 6.0);
        assert_eq!(separation_axis(&a, &b), 1);

        // Flat on x, so only y is considered.
        let p = rect(2.0, 0.0, 2.0, 1.0);
        let q = rect(2.0, 3.0, 2.0, 4.0);
        assert_eq!(separation_axis(&p, &q), 1);
    }

    #[test]
    fn test_even_split_is_a_median_cut() {
        let entries: Vec<_> = [3.0, 0.0, 7.0, 1.0, 6.0, 2.0]
            .iter()
            .map(|y| rect(0.0, *y, 1.0, y + 0.5))
            .collect();
        let assignment = split(&entries, 1);
        assert_eq!(assignment.first_indices().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(assignment.second_indices().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_odd_median_joins_the_closer_half() {
        let entries = vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 0.0, 2.0, 1.0),
            rect(8.0, 0.0, 9.0, 1.0),
            rect(9.0, 0.0, 10.0, 1.0),
            rect(7.5, 0.0, 8.0, 1.0),
        ];
        let assignment = split(&entries, 2);
        assert_eq!(assignment.first_indices().collect::<Vec<_>>(), vec![0, 1]);
        assert!(assignment.is_second(4));
    }
}
