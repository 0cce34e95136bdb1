//! Volume, union and overlap helpers over [`SpatialComparable`] boxes.
//!
//! "Volume" is the product of the per-dimension extents (area in 2D, length
//! in 1D). Degenerate boxes have volume zero.

use crate::error::{ProximaError, Result};
use proxima_types::bbox::{HyperBoundingBox, SpatialComparable};

/// Volume of a single box.
pub fn volume<S: SpatialComparable + ?Sized>(a: &S) -> f64 {
    (0..a.dimensionality())
        .map(|d| a.max(d) - a.min(d))
        .product()
}

/// Volume of the minimal box covering both `a` and `b`.
pub fn volume_union<A, B>(a: &A, b: &B) -> f64
where
    A: SpatialComparable + ?Sized,
    B: SpatialComparable + ?Sized,
{
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    (0..a.dimensionality())
        .map(|d| a.max(d).max(b.max(d)) - a.min(d).min(b.min(d)))
        .product()
}

/// Volume increase of `a` when extended to also cover `b`.
pub fn enlargement<A, B>(a: &A, b: &B) -> f64
where
    A: SpatialComparable + ?Sized,
    B: SpatialComparable + ?Sized,
{
    volume_union(a, b) - volume(a)
}

/// Volume of the intersection of `a` and `b`, zero if they are disjoint.
pub fn overlap<A, B>(a: &A, b: &B) -> f64
where
    A: SpatialComparable + ?Sized,
    B: SpatialComparable + ?Sized,
{
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    let mut vol = 1.0;
    for d in 0..a.dimensionality() {
        let lo = a.min(d).max(b.min(d));
        let hi = a.max(d).min(b.max(d));
        if hi <= lo {
            return 0.0;
        }
        vol *= hi - lo;
    }
    vol
}

/// Minimal box covering the entries selected by `select`.
pub fn union_where<S, F>(entries: &[S], mut select: F) -> Option<HyperBoundingBox>
where
    S: SpatialComparable,
    F: FnMut(usize) -> bool,
{
    let mut bbox: Option<HyperBoundingBox> = None;
    for (i, entry) in entries.iter().enumerate() {
        if !select(i) {
            continue;
        }
        match bbox.as_mut() {
            Some(b) => b.extend(entry),
            None => bbox = Some(HyperBoundingBox::from_spatial(entry)),
        }
    }
    bbox
}

/// Center of a box in dimension `dim`.
pub fn center<S: SpatialComparable + ?Sized>(a: &S, dim: usize) -> f64 {
    (a.min(dim) + a.max(dim)) / 2.0
}

/// Common dimensionality of all entries.
///
/// Fails on an empty slice, on zero-dimensional entries, or when the entries
/// disagree.
pub fn common_dimensionality<S: SpatialComparable>(entries: &[S]) -> Result<usize> {
    let Some(first) = entries.first() else {
        return Err(ProximaError::InvalidInput(
            "Cannot determine dimensionality of an empty entry set".to_string(),
        ));
    };
    let dim = first.dimensionality();
    if dim == 0 {
        return Err(ProximaError::InvalidInput(
            "Entries must have at least one dimension".to_string(),
        ));
    }
    for entry in &entries[1..] {
        if entry.dimensionality() != dim {
            return Err(ProximaError::DimensionMismatch {
                expected: dim,
                found: entry.dimensionality(),
            });
        }
    }
    Ok(dim)
}
