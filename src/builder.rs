//! Index builder for flexible configuration
//!
//! [`IndexBuilder`] collects the distance function and index settings and
//! builds an [`IDistanceIndex`] over a borrowed relation.

use crate::compute::distance::{DistanceFunction, EuclideanDistance};
use crate::config::{IndexConfig, QueryMode};
use crate::error::{ProximaError, Result};
use crate::idistance::IDistanceIndex;
use crate::medoids::{FixedMedoids, Initialization, MedoidInitializer};
use crate::relation::Relation;
use proxima_types::DbId;

/// Builder for iDistance indexes.
///
/// # Examples
///
/// ```rust
/// use proxima::builder::IndexBuilder;
/// use proxima::compute::ManhattanDistance;
/// use proxima::relation::{Relation, VectorRelation};
///
/// let relation = VectorRelation::from_points([[0.0, 0.0], [2.0, 0.0], [9.0, 9.0]])?;
/// let index = IndexBuilder::new()
///     .distance(ManhattanDistance)
///     .num_references(2)
///     .build(&relation)?;
/// assert_eq!(index.knn(&[8.0, 8.0], 1)?.ids(), vec![relation.ids()[2]]);
/// # Ok::<(), proxima::ProximaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder<D = EuclideanDistance> {
    distance: D,
    config: IndexConfig,
    references: Option<Vec<DbId>>,
}

impl IndexBuilder<EuclideanDistance> {
    /// Create a builder with the Euclidean distance and default settings.
    pub fn new() -> Self {
        Self {
            distance: EuclideanDistance,
            config: IndexConfig::default(),
            references: None,
        }
    }
}

impl<D> IndexBuilder<D> {
    /// Replace the distance function.
    pub fn distance<D2>(self, distance: D2) -> IndexBuilder<D2> {
        IndexBuilder {
            distance,
            config: self.config,
            references: self.references,
        }
    }

    /// Replace the whole index configuration.
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn num_references(mut self, num_references: usize) -> Self {
        self.config = self.config.with_num_references(num_references);
        self
    }

    pub fn initialization(mut self, initialization: Initialization) -> Self {
        self.config = self.config.with_initialization(initialization);
        self
    }

    pub fn query_mode(mut self, query_mode: QueryMode) -> Self {
        self.config = self.config.with_query_mode(query_mode);
        self
    }

    /// Number of lists scanned by approximate queries.
    pub fn approximate_references(mut self, lists: usize) -> Self {
        self.config = self.config.with_approximate_references(lists);
        self
    }

    pub fn early_termination(mut self, enabled: bool) -> Self {
        self.config = self.config.with_early_termination(enabled);
        self
    }

    /// Use exactly these objects as reference points, in this order.
    /// Overrides the configured initialization and reference count.
    pub fn reference_points(mut self, ids: Vec<DbId>) -> Self {
        self.references = Some(ids);
        self
    }

    /// Build the index over `relation`.
    pub fn build<R>(self, relation: &R) -> Result<IDistanceIndex<'_, R, D>>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object>,
    {
        match self.references {
            Some(ids) if ids.is_empty() => Err(ProximaError::InvalidConfig(
                "Explicit reference point list is empty".to_string(),
            )),
            Some(ids) => {
                let config = self.config.with_num_references(ids.len());
                IDistanceIndex::build_with(relation, self.distance, config, &FixedMedoids::new(ids))
            }
            None => IDistanceIndex::build(relation, self.distance, self.config),
        }
    }

    /// Build the index with a custom reference point initializer.
    pub fn build_with<'a, R, I>(
        self,
        relation: &'a R,
        initializer: &I,
    ) -> Result<IDistanceIndex<'a, R, D>>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object>,
        I: MedoidInitializer,
    {
        IDistanceIndex::build_with(relation, self.distance, self.config, initializer)
    }
}

impl Default for IndexBuilder<EuclideanDistance> {
    fn default() -> Self {
        Self::new()
    }
}
