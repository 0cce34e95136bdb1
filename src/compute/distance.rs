//! Distance functions used as the oracle for all index structures.
//!
//! Pruning in the iDistance engine relies on the triangle inequality, so each
//! function reports whether it is a metric. Non-metric functions still work,
//! results just become approximate.

/// A distance oracle over objects of type `O`.
///
/// Distances must be non-negative. Implementations returning `true` from
/// [`is_metric`](DistanceFunction::is_metric) must also be symmetric and
/// satisfy the triangle inequality.
pub trait DistanceFunction<O: ?Sized> {
    fn distance(&self, a: &O, b: &O) -> f64;

    /// Whether this function is a true metric.
    fn is_metric(&self) -> bool {
        true
    }

    /// Short human-readable name, used in log output.
    fn name(&self) -> &str;
}

impl<O: ?Sized, D: DistanceFunction<O> + ?Sized> DistanceFunction<O> for &D {
    fn distance(&self, a: &O, b: &O) -> f64 {
        (**self).distance(a, b)
    }

    fn is_metric(&self) -> bool {
        (**self).is_metric()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EuclideanDistance;

impl DistanceFunction<[f64]> for EuclideanDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        SquaredEuclideanDistance.distance(a, b).sqrt()
    }

    fn name(&self) -> &str {
        "euclidean"
    }
}

/// Squared Euclidean distance. Not a metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredEuclideanDistance;

impl DistanceFunction<[f64]> for SquaredEuclideanDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }

    fn is_metric(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "squared-euclidean"
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManhattanDistance;

impl DistanceFunction<[f64]> for ManhattanDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
    }

    fn name(&self) -> &str {
        "manhattan"
    }
}

/// Maximum (Chebyshev, L∞) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaximumDistance;

impl DistanceFunction<[f64]> for MaximumDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    fn name(&self) -> &str {
        "maximum"
    }
}

/// Cosine distance, `1 - cos(a, b)`. Not a metric.
///
/// Zero vectors have distance 1 to everything except other zero vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CosineDistance;

impl DistanceFunction<[f64]> for CosineDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let (mut dot, mut na, mut nb) = (0.0, 0.0, 0.0);
        for (x, y) in a.iter().zip(b) {
            dot += x * y;
            na += x * x;
            nb += y * y;
        }
        if na == 0.0 || nb == 0.0 {
            return if na == nb { 0.0 } else { 1.0 };
        }
        // Rounding can push the cosine slightly above 1.
        (1.0 - dot / (na.sqrt() * nb.sqrt())).max(0.0)
    }

    fn is_metric(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "cosine"
    }
}

/// Adapter turning a closure into a [`DistanceFunction`].
///
/// # Examples
///
/// ```
/// use proxima::compute::distance::{DistanceFunction, FnDistance};
///
/// let absdiff = FnDistance::metric("absdiff", |a: &f64, b: &f64| (a - b).abs());
/// assert_eq!(absdiff.distance(&1.0, &4.0), 3.0);
/// assert!(absdiff.is_metric());
/// ```
#[derive(Clone)]
pub struct FnDistance<F> {
    name: String,
    metric: bool,
    f: F,
}

impl<F> FnDistance<F> {
    /// Wrap a closure that satisfies the metric axioms.
    pub fn metric(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            metric: true,
            f,
        }
    }

    /// Wrap a closure that is not (or not known to be) a metric.
    pub fn non_metric(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            metric: false,
            f,
        }
    }
}

impl<O: ?Sized, F: Fn(&O, &O) -> f64> DistanceFunction<O> for FnDistance<F> {
    fn distance(&self, a: &O, b: &O) -> f64 {
        (self.f)(a, b)
    }

    fn is_metric(&self) -> bool {
        self.metric
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnDistance<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDistance")
            .field("name", &self.name)
            .field("metric", &self.metric)
            .finish()
    }
}
