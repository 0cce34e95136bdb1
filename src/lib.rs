//! Node splitting, M-tree distribution and iDistance reference-point indexing.
//!
//! ```rust
//! use proxima::prelude::*;
//!
//! let relation = VectorRelation::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]])?;
//! let index = IndexBuilder::new().num_references(2).build(&relation)?;
//!
//! let nearest = index.knn(&[4.0, 4.0], 2)?;
//! assert_eq!(nearest.ids()[0], relation.ids()[3]);
//! let close = index.range(&[0.0, 0.0], 1.0)?;
//! assert_eq!(close.len(), 3);
//! # Ok::<(), proxima::ProximaError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod idistance;
pub mod medoids;
pub mod relation;
pub mod scan;
pub mod tree;

pub use builder::IndexBuilder;
pub use config::{IndexConfig, QueryMode, TreeConfig};
pub use error::{ProximaError, Result};
pub use idistance::{IDistanceIndex, IndexStatistics, KnnResult, RangeResult};

pub use proxima_types::{DbId, DistanceId, HyperBoundingBox, IdAllocator, SpatialComparable};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{IndexBuilder, ProximaError, Result};

    pub use crate::{IDistanceIndex, IndexConfig, KnnResult, QueryMode, RangeResult, TreeConfig};

    pub use crate::compute::{DistanceFunction, EuclideanDistance, ManhattanDistance};

    pub use crate::medoids::Initialization;

    pub use crate::relation::{Relation, VectorRelation};

    pub use crate::tree::{DistributionStrategy, Promotion, SplitStrategy};

    pub use proxima_types::{DbId, DistanceId, HyperBoundingBox, SpatialComparable};
}
