//! Distance oracles and box geometry shared by the index structures.

pub mod distance;
pub mod spatial;

pub use distance::{
    CosineDistance, DistanceFunction, EuclideanDistance, FnDistance, ManhattanDistance,
    MaximumDistance, SquaredEuclideanDistance,
};
