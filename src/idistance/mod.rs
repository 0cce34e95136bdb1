//! iDistance: an in-memory reference-point index for kNN and range search.
//!
//! At build time `k` reference points are chosen among the data. Every point
//! is stored, together with its distance, in the list of its nearest
//! reference point; lists are sorted by that distance. A query computes its
//! distance to each reference point and scans each list outward from that
//! distance, using the triangle inequality to skip points that cannot
//! qualify.
//!
//! The index is immutable after [`IDistanceIndex::build`]. Queries take
//! `&self`, so a built index can be shared between threads whenever the
//! relation and distance function can.
//!
//! Reference: H. V. Jagadish, B. C. Ooi, K.-L. Tan, C. Yu, R. Zhang,
//! "iDistance: An adaptive B+-tree based indexing method for nearest
//! neighbor search", ACM TODS 2005.

mod approximate;
mod heap;
mod list;
mod query;
mod result;

pub use heap::KnnHeap;
pub use list::{DistanceList, ListCursor};
pub use result::{KnnResult, RangeResult};

use crate::compute::distance::DistanceFunction;
use crate::config::{IndexConfig, QueryMode};
use crate::error::{ProximaError, Result};
use crate::medoids::MedoidInitializer;
use crate::relation::{DistanceQuery, Relation};
use proxima_types::DbId;
use serde::{Deserialize, Serialize};

/// Size summary of a built index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatistics {
    pub num_references: usize,
    pub size: usize,
    pub min_list_len: usize,
    pub max_list_len: usize,
    pub mean_list_len: f64,
    /// Largest distance stored in any list.
    pub max_radius: f64,
    pub empty_lists: usize,
}

/// Reference-point index over a relation.
///
/// # Examples
///
/// ```
/// use proxima::compute::EuclideanDistance;
/// use proxima::config::IndexConfig;
/// use proxima::idistance::IDistanceIndex;
/// use proxima::relation::{Relation, VectorRelation};
///
/// let relation = VectorRelation::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]])?;
/// let config = IndexConfig::default().with_num_references(2);
/// let index = IDistanceIndex::build(&relation, EuclideanDistance, config)?;
///
/// let result = index.knn(&[0.1, 0.1], 1)?;
/// assert_eq!(result.ids(), vec![relation.ids()[0]]);
/// # Ok::<(), proxima::ProximaError>(())
/// ```
#[derive(Debug)]
pub struct IDistanceIndex<'a, R: ?Sized, D> {
    relation: &'a R,
    distance: D,
    config: IndexConfig,
    references: Vec<DbId>,
    lists: Vec<DistanceList>,
}

impl<'a, R, D> IDistanceIndex<'a, R, D>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object>,
{
    /// Build an index, choosing reference points with the configured
    /// initialization.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, an empty relation, or distances
    /// that are NaN.
    pub fn build(relation: &'a R, distance: D, config: IndexConfig) -> Result<Self> {
        let initialization = config.initialization;
        Self::build_with(relation, distance, config, &initialization)
    }

    /// Build an index with an explicit reference point initializer.
    pub fn build_with<I: MedoidInitializer>(
        relation: &'a R,
        distance: D,
        config: IndexConfig,
        initializer: &I,
    ) -> Result<Self> {
        config.validate()?;
        if relation.is_empty() {
            return Err(ProximaError::EmptyRelation);
        }
        if !distance.is_metric() {
            log::warn!(
                "Distance function '{}' does not report itself as a metric; iDistance pruning assumes the triangle inequality and results may be approximate",
                distance.name()
            );
        }

        let ids = relation.ids();
        let query = DistanceQuery::new(relation, &distance);
        let num_references = config.num_references.min(ids.len());
        let references = initializer.choose_initial_medoids(num_references, &ids, &query);
        if references.is_empty() {
            return Err(ProximaError::InvalidInput(
                "Reference point initialization returned no points".to_string(),
            ));
        }
        let reference_objects = references
            .iter()
            .map(|r| relation.get(*r).ok_or(ProximaError::UnknownId(*r)))
            .collect::<Result<Vec<_>>>()?;

        let expected_len = relation.len() / (2 * references.len());
        let mut lists: Vec<DistanceList> = (0..references.len())
            .map(|_| DistanceList::with_capacity(expected_len))
            .collect();
        for offset in 0..relation.len() {
            let object = relation.object_at(offset);
            let mut best = 0;
            let mut best_distance = distance.distance(object, reference_objects[0]);
            for (i, reference) in reference_objects.iter().enumerate().skip(1) {
                let d = distance.distance(object, reference);
                if d < best_distance {
                    best = i;
                    best_distance = d;
                }
            }
            let id = relation.id_at(offset);
            if best_distance.is_nan() {
                return Err(ProximaError::InvalidInput(format!(
                    "Distance from {} to reference {} is NaN",
                    id, references[best]
                )));
            }
            lists[best].push(best_distance, id);
        }
        for list in &mut lists {
            list.sort();
        }
        debug_assert_eq!(
            lists.iter().map(DistanceList::len).sum::<usize>(),
            relation.len(),
            "reference lists must partition the relation"
        );

        let index = Self {
            relation,
            distance,
            config,
            references,
            lists,
        };
        let stats = index.statistics();
        log::debug!(
            "Built iDistance index: {} points, {} references, list sizes {}..{} (mean {:.1}), {} empty",
            stats.size,
            stats.num_references,
            stats.min_list_len,
            stats.max_list_len,
            stats.mean_list_len,
            stats.empty_lists
        );
        Ok(index)
    }

    /// The `k` nearest neighbors of `object`, using the configured query
    /// mode.
    pub fn knn(&self, object: &R::Object, k: usize) -> Result<KnnResult> {
        match self.config.query_mode {
            QueryMode::Exact => self.exact_knn(object, k),
            QueryMode::Approximate => self.approximate_knn(object, k),
        }
    }

    /// The exact `k` nearest neighbors of `object`, nearest first; ties at
    /// equal distance are ordered by id. Returns every point when `k`
    /// exceeds the index size.
    pub fn exact_knn(&self, object: &R::Object, k: usize) -> Result<KnnResult> {
        self.check_query(object, k)?;
        Ok(query::exact_knn(
            self.distance_query(),
            object,
            &self.references,
            &self.lists,
            k,
            self.config.early_termination,
        ))
    }

    /// Approximate nearest neighbors from the `approximate_references`
    /// nearest lists. May return fewer than `k` points.
    pub fn approximate_knn(&self, object: &R::Object, k: usize) -> Result<KnnResult> {
        self.check_query(object, k)?;
        Ok(approximate::approximate_knn(
            self.distance_query(),
            object,
            &self.references,
            &self.lists,
            k,
            self.config.approximate_references,
        ))
    }

    /// Nearest neighbors of a stored object. The object itself is part of
    /// the result.
    pub fn knn_for_id(&self, id: DbId, k: usize) -> Result<KnnResult> {
        let object = self.relation.get(id).ok_or(ProximaError::UnknownId(id))?;
        self.knn(object, k)
    }

    /// All points within `radius` of `object`, using the configured query
    /// mode.
    pub fn range(&self, object: &R::Object, radius: f64) -> Result<RangeResult> {
        match self.config.query_mode {
            QueryMode::Exact => self.exact_range(object, radius),
            QueryMode::Approximate => self.approximate_range(object, radius),
        }
    }

    /// All points within `radius` (inclusive) of `object`, unordered.
    pub fn exact_range(&self, object: &R::Object, radius: f64) -> Result<RangeResult> {
        self.check_radius(object, radius)?;
        Ok(query::exact_range(
            self.distance_query(),
            object,
            &self.references,
            &self.lists,
            radius,
            self.config.early_termination,
        ))
    }

    /// Points within `radius` found in the nearest reference lists only.
    pub fn approximate_range(&self, object: &R::Object, radius: f64) -> Result<RangeResult> {
        self.check_radius(object, radius)?;
        Ok(approximate::approximate_range(
            self.distance_query(),
            object,
            &self.references,
            &self.lists,
            radius,
            self.config.approximate_references,
        ))
    }

    pub fn statistics(&self) -> IndexStatistics {
        let lens = self.lists.iter().map(DistanceList::len);
        let size: usize = lens.clone().sum();
        IndexStatistics {
            num_references: self.references.len(),
            size,
            min_list_len: lens.clone().min().unwrap_or(0),
            max_list_len: lens.clone().max().unwrap_or(0),
            mean_list_len: size as f64 / self.lists.len().max(1) as f64,
            max_radius: self
                .lists
                .iter()
                .filter_map(DistanceList::radius)
                .fold(0.0, f64::max),
            empty_lists: lens.filter(|len| *len == 0).count(),
        }
    }

    /// Ids of the reference points, in list order.
    pub fn reference_points(&self) -> &[DbId] {
        &self.references
    }

    /// List of the `i`-th reference point.
    pub fn list(&self, i: usize) -> Option<&DistanceList> {
        self.lists.get(i)
    }

    pub fn lists(&self) -> &[DistanceList] {
        &self.lists
    }

    pub fn relation(&self) -> &'a R {
        self.relation
    }

    pub fn distance(&self) -> &D {
        &self.distance
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.relation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relation.is_empty()
    }

    fn distance_query(&self) -> DistanceQuery<'_, R, D> {
        DistanceQuery::new(self.relation, &self.distance)
    }

    fn check_query(&self, object: &R::Object, k: usize) -> Result<()> {
        if k == 0 {
            return Err(ProximaError::InvalidInput(
                "k must be greater than zero".to_string(),
            ));
        }
        self.relation.check_object(object)
    }

    fn check_radius(&self, object: &R::Object, radius: f64) -> Result<()> {
        if radius.is_nan() || radius < 0.0 {
            return Err(ProximaError::InvalidInput(format!(
                "Query radius must be a non-negative number, got: {}",
                radius
            )));
        }
        self.relation.check_object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::{EuclideanDistance, SquaredEuclideanDistance};
    use crate::medoids::{FirstKMedoids, Initialization};
    use crate::relation::VectorRelation;
    use rustc_hash::FxHashSet;

    fn grid(n: usize) -> VectorRelation {
        VectorRelation::from_points(
            (0..n * n).map(|i| [(i % n) as f64, (i / n) as f64]),
        )
        .unwrap()
    }

    #[test]
    fn test_lists_partition_the_relation() {
        let relation = grid(12);
        let config = IndexConfig::default().with_num_references(7);
        let index = IDistanceIndex::build(&relation, EuclideanDistance, config).unwrap();

        assert_eq!(index.reference_points().len(), 7);
        let mut seen = FxHashSet::default();
        for list in index.lists() {
            assert!(list.is_sorted());
            for id in list.ids() {
                assert!(seen.insert(id), "{} listed twice", id);
            }
        }
        assert_eq!(seen.len(), relation.len());
    }

    #[test]
    fn test_points_join_their_nearest_reference() {
        let relation = grid(6);
        let config = IndexConfig::default().with_num_references(4);
        let index = IDistanceIndex::build(&relation, EuclideanDistance, config).unwrap();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        for (i, list) in index.lists().iter().enumerate() {
            for entry in list {
                let own = query.between(entry.id, index.reference_points()[i]);
                assert_eq!(own, entry.distance);
                for r in index.reference_points() {
                    assert!(own <= query.between(entry.id, *r));
                }
            }
        }
    }

    #[test]
    fn test_more_references_than_points() {
        let relation = VectorRelation::from_points([[0.0], [1.0], [2.0]]).unwrap();
        let config = IndexConfig::default().with_num_references(10);
        let index = IDistanceIndex::build(&relation, EuclideanDistance, config).unwrap();
        let stats = index.statistics();
        assert_eq!(stats.num_references, 3);
        assert_eq!(stats.size, 3);
        assert_eq!(stats.max_list_len, 1);
        assert_eq!(stats.max_radius, 0.0);
    }

    #[test]
    fn test_duplicate_points_leave_lists_empty() {
        let relation = VectorRelation::from_points([[1.0, 1.0], [1.0, 1.0], [3.0, 3.0]]).unwrap();
        let config = IndexConfig::default().with_num_references(3);
        let index = IDistanceIndex::build_with(&relation, EuclideanDistance, config, &FirstKMedoids)
            .unwrap();
        assert_eq!(index.list(1).map(DistanceList::len), Some(0));
        assert_eq!(index.statistics().empty_lists, 1);
        let result = index.knn(&[1.0, 1.0], 2).unwrap();
        assert_eq!(result.ids(), vec![DbId::new(0), DbId::new(1)]);
    }

    #[test]
    fn test_query_validation() {
        let relation = grid(3);
        let index = IDistanceIndex::build(&relation, EuclideanDistance, IndexConfig::default())
            .unwrap();
        assert!(index.knn(&[0.0, 0.0], 0).is_err());
        assert!(matches!(
            index.knn(&[0.0], 1),
            Err(ProximaError::DimensionMismatch { .. })
        ));
        assert!(index.range(&[0.0, 0.0], -1.0).is_err());
        assert!(index.range(&[0.0, 0.0], f64::NAN).is_err());
        assert!(matches!(
            index.knn_for_id(DbId::new(99), 1),
            Err(ProximaError::UnknownId(_))
        ));
    }

    #[test]
    fn test_k_exceeding_size_returns_everything() {
        let relation = grid(3);
        let index = IDistanceIndex::build(&relation, EuclideanDistance, IndexConfig::default())
            .unwrap();
        let result = index.knn(&[1.0, 1.0], 50).unwrap();
        assert_eq!(result.len(), 9);
        assert_eq!(result.ids()[0], DbId::new(4));
    }

    #[test]
    fn test_non_metric_distance_still_builds() {
        let relation = grid(5);
        let config = IndexConfig::default()
            .with_num_references(3)
            .with_initialization(Initialization::FirstK);
        let index = IDistanceIndex::build(&relation, SquaredEuclideanDistance, config).unwrap();
        let result = index.knn(&[2.0, 2.0], 1).unwrap();
        assert_eq!(result.ids(), vec![DbId::new(12)]);
    }

    #[test]
    fn test_empty_relation_is_rejected() {
        let relation = VectorRelation::new(2).unwrap();
        assert!(matches!(
            IDistanceIndex::build(&relation, EuclideanDistance, IndexConfig::default()),
            Err(ProximaError::EmptyRelation)
        ));
    }
}
