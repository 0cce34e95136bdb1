//! Guttman's linear split.
//!
//! Seeds are the pair of entries that are most separated along any axis,
//! normalized by the extent of that axis. The remaining entries are visited
//! once, in order, and each goes to the group whose box grows least.
//!
//! Reference: A. Guttman, "R-Trees: A Dynamic Index Structure for Spatial
//! Searching", SIGMOD 1984.

use super::SplitAssignment;
use crate::compute::spatial::{enlargement, volume};
use proxima_types::bbox::{HyperBoundingBox, SpatialComparable};

/// Split `entries`; the input must satisfy the checks of
/// [`SplitStrategy::split`](super::SplitStrategy::split).
pub fn split<S: SpatialComparable>(entries: &[S], min_entries: usize) -> SplitAssignment {
    let num = entries.len();
    let (w1, w2) = pick_seeds(entries);
    debug_assert_ne!(w1, w2);

    let mut assignment = SplitAssignment::new(num);
    assignment.set_second(w2);
    let mut mbr1 = HyperBoundingBox::from_spatial(&entries[w1]);
    let mut mbr2 = HyperBoundingBox::from_spatial(&entries[w2]);
    let (mut num1, mut num2) = (1, 1);

    let remaining: Vec<usize> = (0..num).filter(|i| *i != w1 && *i != w2).collect();
    for (pos, &i) in remaining.iter().enumerate() {
        let rem = remaining.len() - pos;
        // Fill up a group that would otherwise end up below min_entries.
        if num1 + rem <= min_entries {
            break;
        }
        if num2 + rem <= min_entries {
            for &j in &remaining[pos..] {
                assignment.set_second(j);
            }
            return assignment;
        }

        let entry = &entries[i];
        let inc1 = enlargement(&mbr1, entry);
        let inc2 = enlargement(&mbr2, entry);
        let to_first = if inc1 != inc2 {
            inc1 < inc2
        } else {
            let (vol1, vol2) = (volume(&mbr1), volume(&mbr2));
            if vol1 != vol2 {
                vol1 < vol2
            } else {
                num1 <= num2
            }
        };
        if to_first {
            mbr1.extend(entry);
            num1 += 1;
        } else {
            assignment.set_second(i);
            mbr2.extend(entry);
            num2 += 1;
        }
    }
    // Entries left after a `break` stay in the first group.
    assignment
}

/// Linear seed picking.
///
/// For each axis, take the entry with the lowest high edge and, among the
/// others, the entry with the highest low edge. Their gap divided by the
/// axis extent is the separation; the axis with the largest separation
/// supplies the seeds.
fn pick_seeds<S: SpatialComparable>(entries: &[S]) -> (usize, usize) {
    let dim = entries[0].dimensionality();
    let mut best = (0, 1);
    let mut best_sep = f64::NEG_INFINITY;

    for d in 0..dim {
        let mut lowest_high = 0;
        let (mut total_min, mut total_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (i, e) in entries.iter().enumerate() {
            if e.max(d) < entries[lowest_high].max(d) {
                lowest_high = i;
            }
            total_min = total_min.min(e.min(d));
            total_max = total_max.max(e.max(d));
        }
        let mut highest_low = if lowest_high == 0 { 1 } else { 0 };
        for (i, e) in entries.iter().enumerate() {
            if i != lowest_high && e.min(d) > entries[highest_low].min(d) {
                highest_low = i;
            }
        }

        let width = total_max - total_min;
        let gap = entries[highest_low].min(d) - entries[lowest_high].max(d);
        let sep = if width > 0.0 { gap / width } else { 0.0 };
        if sep > best_sep {
            best_sep = sep;
            best = (lowest_high, highest_low);
        }
    }
    best
}
