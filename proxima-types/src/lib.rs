//! # proxima-types
//!
//! Core value types shared by the Proxima indexing engine.
//!
//! - **Bounding boxes**: `HyperBoundingBox` and the `SpatialComparable` accessor
//!   trait consumed by the node split strategies
//! - **Identifiers**: `DbId` and the explicit `IdAllocator`
//! - **Distance pairs**: `DistanceId`, the `(distance, id)` element of every
//!   reference list and query result
//!
//! All types are serializable with Serde. `geo` rectangles/points and `rstar`
//! envelopes can be used wherever a `SpatialComparable` is expected.
//!
//! ## Examples
//!
//! ```rust
//! use proxima_types::bbox::{HyperBoundingBox, SpatialComparable};
//!
//! let bbox = HyperBoundingBox::new(vec![0.0, 0.0], vec![2.0, 1.0]);
//! assert_eq!(bbox.dimensionality(), 2);
//! assert_eq!(bbox.max(0), 2.0);
//! ```

pub mod bbox;
pub mod id;
pub mod pair;

pub use bbox::{HyperBoundingBox, SpatialComparable};
pub use id::{DbId, IdAllocator};
pub use pair::DistanceId;
