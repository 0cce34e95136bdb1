//! Approximate search: only the lists of the nearest reference points are
//! scanned, and a kNN scan leaves a list as soon as it has contributed `k`
//! neighbors. Results may hold fewer than `k` points and may miss true
//! neighbors stored in other lists.

use super::list::DistanceList;
use super::query::{KnnCollector, RangeCollector, rank_references, scan_list};
use super::result::{KnnResult, RangeResult};
use crate::compute::distance::DistanceFunction;
use crate::relation::{DistanceQuery, Relation};
use proxima_types::DbId;

pub(crate) fn approximate_knn<R, D>(
    query: DistanceQuery<'_, R, D>,
    object: &R::Object,
    references: &[DbId],
    lists: &[DistanceList],
    k: usize,
    num_lists: usize,
) -> KnnResult
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    let ranked = rank_references(&query, object, references);
    let mut collector = KnnCollector::new(query, object, k);
    for &(ref_distance, i) in ranked.iter().take(num_lists) {
        scan_list(&lists[i], ref_distance, &mut collector, Some(k));
    }
    let result = collector.into_result();
    log::trace!(
        "approximate kNN (k = {}): {} results from {} lists, {} refinements",
        k,
        result.len(),
        num_lists.min(ranked.len()),
        result.refinements()
    );
    result
}

pub(crate) fn approximate_range<R, D>(
    query: DistanceQuery<'_, R, D>,
    object: &R::Object,
    references: &[DbId],
    lists: &[DistanceList],
    radius: f64,
    num_lists: usize,
) -> RangeResult
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    let ranked = rank_references(&query, object, references);
    let mut collector = RangeCollector::new(query, object, radius);
    for &(ref_distance, i) in ranked.iter().take(num_lists) {
        scan_list(&lists[i], ref_distance, &mut collector, None);
    }
    collector.into_result()
}
