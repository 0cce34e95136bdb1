//! Exact kNN and range search over the reference lists.
//!
//! All pruning rests on the triangle inequality. For a point `p` stored in
//! the list of reference `r` with distance `d(p, r)`, and a query `q`,
//!
//! ```text
//! d(q, p) >= |d(p, r) - d(q, r)|
//! ```
//!
//! so each list is scanned outward from the position of `d(q, r)`, and a
//! direction stops once this lower bound exceeds the current query radius.

use super::heap::KnnHeap;
use super::list::{DistanceList, ListCursor};
use super::result::{KnnResult, RangeResult};
use crate::compute::distance::DistanceFunction;
use crate::relation::{DistanceQuery, Relation};
use proxima_types::{DbId, DistanceId};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// `(distance to query, reference index)`, nearest first.
pub(crate) type RankedReferences = SmallVec<[(f64, usize); 32]>;

/// Rank reference points by distance to `object`. Ties keep reference order.
pub(crate) fn rank_references<R, D>(
    query: &DistanceQuery<'_, R, D>,
    object: &R::Object,
    references: &[DbId],
) -> RankedReferences
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    let mut ranked: RankedReferences = references
        .iter()
        .enumerate()
        .map(|(i, r)| (query.to_object(object, *r), i))
        .collect();
    ranked.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    ranked
}

/// Receives candidates found while scanning a list.
pub(crate) trait Collector {
    /// Current query radius. Candidates with a larger lower bound are
    /// skipped.
    fn bound(&self) -> f64;

    /// Compute the true distance of a candidate and keep it if it is within
    /// the radius. Returns whether it was kept.
    fn refine(&mut self, id: DbId) -> bool;
}

/// Collects the k nearest neighbors.
pub(crate) struct KnnCollector<'q, R: ?Sized + Relation, D: ?Sized> {
    query: DistanceQuery<'q, R, D>,
    object: &'q R::Object,
    heap: KnnHeap,
    refinements: usize,
}

impl<'q, R, D> KnnCollector<'q, R, D>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    pub(crate) fn new(query: DistanceQuery<'q, R, D>, object: &'q R::Object, k: usize) -> Self {
        Self {
            query,
            object,
            heap: KnnHeap::new(k),
            refinements: 0,
        }
    }

    pub(crate) fn into_result(self) -> KnnResult {
        KnnResult::new(self.heap.into_sorted_vec(), self.refinements)
    }
}

impl<R, D> Collector for KnnCollector<'_, R, D>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    fn bound(&self) -> f64 {
        self.heap.kth_distance()
    }

    fn refine(&mut self, id: DbId) -> bool {
        let dist = self.query.to_object(self.object, id);
        self.refinements += 1;
        dist <= self.heap.kth_distance() && self.heap.insert(dist, id)
    }
}

/// Collects every point within a fixed radius.
pub(crate) struct RangeCollector<'q, R: ?Sized + Relation, D: ?Sized> {
    query: DistanceQuery<'q, R, D>,
    object: &'q R::Object,
    radius: f64,
    matches: Vec<DistanceId>,
    refinements: usize,
}

impl<'q, R, D> RangeCollector<'q, R, D>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    pub(crate) fn new(query: DistanceQuery<'q, R, D>, object: &'q R::Object, radius: f64) -> Self {
        Self {
            query,
            object,
            radius,
            matches: Vec::new(),
            refinements: 0,
        }
    }

    pub(crate) fn into_result(self) -> RangeResult {
        RangeResult::new(self.matches, self.refinements)
    }
}

impl<R, D> Collector for RangeCollector<'_, R, D>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    fn bound(&self) -> f64 {
        self.radius
    }

    fn refine(&mut self, id: DbId) -> bool {
        let dist = self.query.to_object(self.object, id);
        self.refinements += 1;
        if dist <= self.radius {
            self.matches.push(DistanceId::new(dist, id));
            true
        } else {
            false
        }
    }
}

/// Relative slack added to a query radius before comparing lower bounds.
///
/// `|d(p, r) - d(q, r)|` may round above the distance it bounds, which would
/// drop candidates tied with the current k-distance.
const BOUND_TOLERANCE: f64 = 1e-9;

/// `bound` widened by the rounding slack for values of magnitude
/// `ref_distance`. Infinite bounds stay infinite.
fn widen(bound: f64, ref_distance: f64) -> f64 {
    bound + (bound.abs() + ref_distance.abs()) * BOUND_TOLERANCE
}

/// Lower bound of the distance between the query and the cursor's entry;
/// NaN once the cursor has left the list.
fn lower_bound(cursor: &ListCursor<'_>, ref_distance: f64) -> f64 {
    (cursor.distance() - ref_distance).abs()
}

/// Scan `list` outward from the position of `ref_distance`, the distance
/// between the query and the list's reference point.
///
/// Both directions advance alternately, the one with the smaller lower bound
/// first (forward on ties). The scan ends when both bounds exceed the
/// collector's radius or both directions are exhausted, or once
/// `max_accepted` candidates have been kept.
///
/// NaN bounds never satisfy a comparison, so exhausted directions drop out
/// on their own.
pub(crate) fn scan_list<C: Collector>(
    list: &DistanceList,
    ref_distance: f64,
    collector: &mut C,
    max_accepted: Option<usize>,
) -> usize {
    if list.is_empty() {
        return 0;
    }
    let start = list.search(ref_distance);
    let mut bwd = list.cursor_at(start);
    let mut fwd = list.cursor_at(start + 1);
    let mut lb_fwd = lower_bound(&fwd, ref_distance);
    let mut lb_bwd = lower_bound(&bwd, ref_distance);
    let mut accepted = 0;
    let saturated = |accepted: usize| max_accepted.is_some_and(|max| accepted >= max);

    loop {
        let bound = widen(collector.bound(), ref_distance);
        if !(lb_fwd <= bound) && !(lb_bwd <= bound) {
            break;
        }
        if saturated(accepted) {
            break;
        }
        if lb_fwd <= bound && !(lb_fwd > lb_bwd) {
            if let Some(candidate) = fwd.peek()
                && collector.refine(candidate.id)
            {
                accepted += 1;
            }
            fwd.advance();
            lb_fwd = lower_bound(&fwd, ref_distance);
            if saturated(accepted) {
                break;
            }
        }
        let bound = widen(collector.bound(), ref_distance);
        if lb_bwd <= bound && !(lb_bwd > lb_fwd) {
            if let Some(candidate) = bwd.peek()
                && collector.refine(candidate.id)
            {
                accepted += 1;
            }
            bwd.retract();
            lb_bwd = lower_bound(&bwd, ref_distance);
        }
    }
    accepted
}

/// Exact k nearest neighbors.
///
/// With `early_termination`, lists are skipped once the k-distance is below
/// `(d(q, r_i) - d(q, r_0)) / 2`, `r_0` being the reference nearest to the
/// query. Every point in the list of `r_i` is at least as close to `r_i` as
/// to `r_0`, which makes this a lower bound for the whole list, and it only
/// grows along the ranking.
pub(crate) fn exact_knn<R, D>(
    query: DistanceQuery<'_, R, D>,
    object: &R::Object,
    references: &[DbId],
    lists: &[DistanceList],
    k: usize,
    early_termination: bool,
) -> KnnResult
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    let ranked = rank_references(&query, object, references);
    let early_termination = early_termination && query.distance_function().is_metric();
    let nearest = ranked.first().map_or(0.0, |r| r.0);
    let mut collector = KnnCollector::new(query, object, k);
    let mut scanned = 0;

    for &(ref_distance, i) in &ranked {
        if early_termination
            && widen(collector.bound(), ref_distance) < (ref_distance - nearest) / 2.0
        {
            break;
        }
        scan_list(&lists[i], ref_distance, &mut collector, None);
        scanned += 1;
    }
    log::trace!(
        "exact kNN (k = {}): scanned {} of {} lists, {} refinements",
        k,
        scanned,
        ranked.len(),
        collector.refinements
    );
    collector.into_result()
}

/// Exact range query.
pub(crate) fn exact_range<R, D>(
    query: DistanceQuery<'_, R, D>,
    object: &R::Object,
    references: &[DbId],
    lists: &[DistanceList],
    radius: f64,
    early_termination: bool,
) -> RangeResult
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    let ranked = rank_references(&query, object, references);
    let early_termination = early_termination && query.distance_function().is_metric();
    let nearest = ranked.first().map_or(0.0, |r| r.0);
    let mut collector = RangeCollector::new(query, object, radius);

    for &(ref_distance, i) in &ranked {
        if early_termination && widen(radius, ref_distance) < (ref_distance - nearest) / 2.0 {
            break;
        }
        scan_list(&lists[i], ref_distance, &mut collector, None);
    }
    log::trace!(
        "range query (r = {}): {} matches, {} refinements",
        radius,
        collector.matches.len(),
        collector.refinements
    );
    collector.into_result()
}
