//! Linear-scan kNN and range search.
//!
//! No index, no pruning: every object is compared with the query. This is
//! the reference the index results are checked against, and the baseline
//! the benchmarks compare with.

use crate::compute::distance::DistanceFunction;
use crate::error::{ProximaError, Result};
use crate::idistance::{KnnHeap, KnnResult, RangeResult};
use crate::relation::Relation;
use proxima_types::DistanceId;

/// Find the `k` nearest neighbors of `object` by comparing against every
/// object of the relation.
///
/// # Arguments
///
/// * `relation` - Objects to search
/// * `distance` - Distance function
/// * `object` - Query object
/// * `k` - Number of neighbors to return
///
/// # Returns
///
/// Neighbors sorted by distance (nearest first, ties by id)
///
/// # Examples
///
/// ```rust
/// use proxima::compute::EuclideanDistance;
/// use proxima::relation::VectorRelation;
/// use proxima::scan::linear_knn;
///
/// let relation = VectorRelation::from_points([[0.0, 0.0], [3.0, 4.0], [1.0, 1.0]])?;
/// let nearest = linear_knn(&relation, &EuclideanDistance, &[0.0, 0.5][..], 2)?;
/// assert_eq!(nearest.len(), 2);
/// assert_eq!(nearest.refinements(), 3);
/// # Ok::<(), proxima::ProximaError>(())
/// ```
pub fn linear_knn<R, D>(
    relation: &R,
    distance: &D,
    object: &R::Object,
    k: usize,
) -> Result<KnnResult>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    if k == 0 {
        return Err(ProximaError::InvalidInput(
            "k must be greater than zero".to_string(),
        ));
    }
    relation.check_object(object)?;
    let mut heap = KnnHeap::new(k);
    for offset in 0..relation.len() {
        let dist = distance.distance(object, relation.object_at(offset));
        heap.insert(dist, relation.id_at(offset));
    }
    Ok(KnnResult::new(heap.into_sorted_vec(), relation.len()))
}

/// Find every object within `radius` of `object`, in relation order.
pub fn linear_range<R, D>(
    relation: &R,
    distance: &D,
    object: &R::Object,
    radius: f64,
) -> Result<RangeResult>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    if radius.is_nan() || radius < 0.0 {
        return Err(ProximaError::InvalidInput(format!(
            "Query radius must be a non-negative number, got: {}",
            radius
        )));
    }
    relation.check_object(object)?;
    let matches = (0..relation.len())
        .filter_map(|offset| {
            let dist = distance.distance(object, relation.object_at(offset));
            (dist <= radius).then(|| DistanceId::new(dist, relation.id_at(offset)))
        })
        .collect();
    Ok(RangeResult::new(matches, relation.len()))
}
