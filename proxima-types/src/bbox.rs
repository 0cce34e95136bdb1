use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Read access to the extent of an axis-aligned box.
///
/// This is the only view split strategies need of a node entry, so any
/// container (boxes, points, tree entries, `geo`/`rstar` envelopes) can be
/// split without copying into a specific type.
pub trait SpatialComparable {
    /// Number of dimensions.
    fn dimensionality(&self) -> usize;

    /// Lower edge in dimension `dim`.
    fn min(&self, dim: usize) -> f64;

    /// Upper edge in dimension `dim`.
    fn max(&self, dim: usize) -> f64;
}

impl<T: SpatialComparable + ?Sized> SpatialComparable for &T {
    fn dimensionality(&self) -> usize {
        (**self).dimensionality()
    }

    fn min(&self, dim: usize) -> f64 {
        (**self).min(dim)
    }

    fn max(&self, dim: usize) -> f64 {
        (**self).max(dim)
    }
}

/// A point is a degenerate box with `min == max`.
impl SpatialComparable for [f64] {
    fn dimensionality(&self) -> usize {
        self.len()
    }

    fn min(&self, dim: usize) -> f64 {
        self[dim]
    }

    fn max(&self, dim: usize) -> f64 {
        self[dim]
    }
}

impl SpatialComparable for Vec<f64> {
    fn dimensionality(&self) -> usize {
        self.len()
    }

    fn min(&self, dim: usize) -> f64 {
        self[dim]
    }

    fn max(&self, dim: usize) -> f64 {
        self[dim]
    }
}

impl SpatialComparable for Rect<f64> {
    fn dimensionality(&self) -> usize {
        2
    }

    fn min(&self, dim: usize) -> f64 {
        match dim {
            0 => Rect::min(*self).x,
            1 => Rect::min(*self).y,
            _ => panic!("dimension {} out of range for a 2D rectangle", dim),
        }
    }

    fn max(&self, dim: usize) -> f64 {
        match dim {
            0 => Rect::max(*self).x,
            1 => Rect::max(*self).y,
            _ => panic!("dimension {} out of range for a 2D rectangle", dim),
        }
    }
}

impl<const N: usize> SpatialComparable for rstar::AABB<[f64; N]> {
    fn dimensionality(&self) -> usize {
        N
    }

    fn min(&self, dim: usize) -> f64 {
        self.lower()[dim]
    }

    fn max(&self, dim: usize) -> f64 {
        self.upper()[dim]
    }
}

/// An n-dimensional axis-aligned bounding box.
///
/// Invariant: `min[d] <= max[d]` for every dimension `d`. Constructors swap
/// reversed edges instead of rejecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperBoundingBox {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl HyperBoundingBox {
    /// Create a new bounding box from its lower and upper corners.
    ///
    /// # Panics
    ///
    /// Panics if the corners have different dimensionality.
    ///
    /// # Examples
    ///
    /// ```
    /// use proxima_types::bbox::{HyperBoundingBox, SpatialComparable};
    ///
    /// let bbox = HyperBoundingBox::new(vec![3.0, 0.0], vec![1.0, 2.0]);
    /// assert_eq!(bbox.min(0), 1.0);
    /// assert_eq!(bbox.max(0), 3.0);
    /// ```
    pub fn new(mut min: Vec<f64>, mut max: Vec<f64>) -> Self {
        assert_eq!(
            min.len(),
            max.len(),
            "Bounding box corners must have the same dimensionality"
        );
        for d in 0..min.len() {
            if min[d] > max[d] {
                std::mem::swap(&mut min[d], &mut max[d]);
            }
        }
        Self { min, max }
    }

    /// Create a degenerate box covering a single point.
    pub fn point(coords: &[f64]) -> Self {
        Self {
            min: coords.to_vec(),
            max: coords.to_vec(),
        }
    }

    /// Copy the extent of any spatial object.
    pub fn from_spatial<S: SpatialComparable + ?Sized>(spatial: &S) -> Self {
        let dim = spatial.dimensionality();
        Self {
            min: (0..dim).map(|d| spatial.min(d)).collect(),
            max: (0..dim).map(|d| spatial.max(d)).collect(),
        }
    }

    /// Minimal box covering all given objects, or `None` for an empty input.
    pub fn union_of<'a, S, I>(items: I) -> Option<Self>
    where
        S: SpatialComparable + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut iter = items.into_iter();
        let mut bbox = Self::from_spatial(iter.next()?);
        for item in iter {
            bbox.extend(item);
        }
        Some(bbox)
    }

    /// Grow this box to also cover `other`.
    pub fn extend<S: SpatialComparable + ?Sized>(&mut self, other: &S) {
        debug_assert_eq!(self.dimensionality(), other.dimensionality());
        for d in 0..self.min.len() {
            self.min[d] = self.min[d].min(other.min(d));
            self.max[d] = self.max[d].max(other.max(d));
        }
    }

    /// Lower corner.
    pub fn mins(&self) -> &[f64] {
        &self.min
    }

    /// Upper corner.
    pub fn maxs(&self) -> &[f64] {
        &self.max
    }

    /// Extent in dimension `dim`.
    pub fn extent(&self, dim: usize) -> f64 {
        self.max[dim] - self.min[dim]
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec<f64> {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect()
    }

    /// Check if a point is contained within this bounding box.
    pub fn contains_point(&self, point: &[f64]) -> bool {
        point.len() == self.min.len()
            && point
                .iter()
                .enumerate()
                .all(|(d, v)| *v >= self.min[d] && *v <= self.max[d])
    }

    /// Check if this bounding box intersects with another.
    pub fn intersects<S: SpatialComparable + ?Sized>(&self, other: &S) -> bool {
        (0..self.min.len()).all(|d| self.max[d] >= other.min(d) && self.min[d] <= other.max(d))
    }
}

impl SpatialComparable for HyperBoundingBox {
    fn dimensionality(&self) -> usize {
        self.min.len()
    }

    fn min(&self, dim: usize) -> f64 {
        self.min[dim]
    }

    fn max(&self, dim: usize) -> f64 {
        self.max[dim]
    }
}

impl From<Rect<f64>> for HyperBoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::from_spatial(&rect)
    }
}

impl From<Point<f64>> for HyperBoundingBox {
    fn from(point: Point<f64>) -> Self {
        Self::point(&[point.x(), point.y()])
    }
}
