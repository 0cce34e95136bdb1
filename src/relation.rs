//! Relations: the set of objects an index is built over.
//!
//! A [`Relation`] enumerates object ids and resolves ids to objects. The
//! in-memory [`VectorRelation`] stores fixed-dimensional `f64` vectors and
//! draws its ids from an explicit [`IdAllocator`].

use crate::compute::distance::DistanceFunction;
use crate::error::{ProximaError, Result};
use proxima_types::{DbId, IdAllocator};
use rustc_hash::FxHashMap;

/// Read access to an indexed object collection.
///
/// Objects are addressed both by id and by offset (`0..len()`), offsets
/// giving the enumeration order.
pub trait Relation {
    type Object: ?Sized;

    /// Number of objects.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the object at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len()`.
    fn id_at(&self, offset: usize) -> DbId;

    /// Object at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len()`.
    fn object_at(&self, offset: usize) -> &Self::Object;

    /// Offset of the object with the given id.
    fn offset_of(&self, id: DbId) -> Option<usize>;

    /// Object with the given id.
    fn get(&self, id: DbId) -> Option<&Self::Object> {
        self.offset_of(id).map(|offset| self.object_at(offset))
    }

    /// All ids in enumeration order.
    fn ids(&self) -> Vec<DbId> {
        (0..self.len()).map(|offset| self.id_at(offset)).collect()
    }

    /// Reject query objects that cannot be compared with the stored ones.
    fn check_object(&self, _object: &Self::Object) -> Result<()> {
        Ok(())
    }
}

/// In-memory relation of fixed-dimensional vectors.
///
/// # Examples
///
/// ```
/// use proxima::relation::{Relation, VectorRelation};
///
/// let relation = VectorRelation::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])?;
/// assert_eq!(relation.len(), 3);
/// let id = relation.id_at(1);
/// assert_eq!(relation.get(id), Some(&[1.0, 0.0][..]));
/// # Ok::<(), proxima::ProximaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VectorRelation {
    dim: usize,
    ids: Vec<DbId>,
    data: Vec<f64>,
    offsets: FxHashMap<DbId, usize>,
}

impl VectorRelation {
    /// Create an empty relation of `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ProximaError::InvalidInput(
                "Vector dimensionality must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            dim,
            ids: Vec::new(),
            data: Vec::new(),
            offsets: FxHashMap::default(),
        })
    }

    /// Build a relation from points, allocating ids `0..n`.
    ///
    /// The dimensionality is taken from the first point.
    pub fn from_points<P, I>(points: I) -> Result<Self>
    where
        P: AsRef<[f64]>,
        I: IntoIterator<Item = P>,
    {
        let mut allocator = IdAllocator::new();
        Self::from_points_with(points, &mut allocator)
    }

    /// Build a relation from points, drawing ids from `allocator`.
    pub fn from_points_with<P, I>(points: I, allocator: &mut IdAllocator) -> Result<Self>
    where
        P: AsRef<[f64]>,
        I: IntoIterator<Item = P>,
    {
        let mut iter = points.into_iter().peekable();
        let Some(first) = iter.peek() else {
            return Err(ProximaError::EmptyRelation);
        };
        let mut relation = Self::new(first.as_ref().len())?;
        for point in iter {
            relation.push(allocator, point.as_ref())?;
        }
        Ok(relation)
    }

    /// Build a relation from 2D `geo` points.
    pub fn from_geo_points(points: &[geo::Point<f64>]) -> Result<Self> {
        Self::from_points(points.iter().map(|p| [p.x(), p.y()]))
    }

    /// Append a vector, returning its newly allocated id.
    pub fn push(&mut self, allocator: &mut IdAllocator, coords: &[f64]) -> Result<DbId> {
        self.check_coords(coords)?;
        let id = allocator.allocate();
        if self.offsets.contains_key(&id) {
            return Err(ProximaError::InvalidInput(format!(
                "Id {} allocated twice; allocators must not be shared across relations",
                id
            )));
        }
        self.offsets.insert(id, self.ids.len());
        self.ids.push(id);
        self.data.extend_from_slice(coords);
        Ok(id)
    }

    /// Vector dimensionality.
    pub fn dimensionality(&self) -> usize {
        self.dim
    }

    /// Iterate over `(id, vector)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (DbId, &[f64])> + '_ {
        self.ids.iter().copied().zip(self.data.chunks_exact(self.dim))
    }

    fn check_coords(&self, coords: &[f64]) -> Result<()> {
        if coords.len() != self.dim {
            return Err(ProximaError::DimensionMismatch {
                expected: self.dim,
                found: coords.len(),
            });
        }
        if let Some(bad) = coords.iter().find(|v| !v.is_finite()) {
            return Err(ProximaError::InvalidInput(format!(
                "Coordinates must be finite, got: {}",
                bad
            )));
        }
        Ok(())
    }
}

impl Relation for VectorRelation {
    type Object = [f64];

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn id_at(&self, offset: usize) -> DbId {
        self.ids[offset]
    }

    fn object_at(&self, offset: usize) -> &[f64] {
        &self.data[offset * self.dim..(offset + 1) * self.dim]
    }

    fn offset_of(&self, id: DbId) -> Option<usize> {
        self.offsets.get(&id).copied()
    }

    fn ids(&self) -> Vec<DbId> {
        self.ids.clone()
    }

    fn check_object(&self, object: &[f64]) -> Result<()> {
        self.check_coords(object)
    }
}

/// A distance function bound to a relation, computing distances by id.
pub struct DistanceQuery<'a, R: ?Sized, D: ?Sized> {
    relation: &'a R,
    distance: &'a D,
}

impl<'a, R, D> DistanceQuery<'a, R, D>
where
    R: Relation + ?Sized,
    D: DistanceFunction<R::Object> + ?Sized,
{
    pub fn new(relation: &'a R, distance: &'a D) -> Self {
        Self { relation, distance }
    }

    pub fn relation(&self) -> &'a R {
        self.relation
    }

    pub fn distance_function(&self) -> &'a D {
        self.distance
    }

    /// Distance between two stored objects.
    ///
    /// Ids must belong to the relation; unknown ids are a programming error
    /// and yield `f64::INFINITY` in release builds.
    pub fn between(&self, a: DbId, b: DbId) -> f64 {
        match (self.relation.get(a), self.relation.get(b)) {
            (Some(oa), Some(ob)) => self.distance.distance(oa, ob),
            _ => {
                debug_assert!(false, "distance requested for unknown id {} or {}", a, b);
                f64::INFINITY
            }
        }
    }

    /// Distance between an external object and a stored one.
    pub fn to_object(&self, object: &R::Object, id: DbId) -> f64 {
        match self.relation.get(id) {
            Some(stored) => self.distance.distance(object, stored),
            None => {
                debug_assert!(false, "distance requested for unknown id {}", id);
                f64::INFINITY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::EuclideanDistance;

    #[test]
    fn test_push_and_lookup() {
        let mut ids = IdAllocator::starting_at(100);
        let mut relation = VectorRelation::new(2).unwrap();
        let a = relation.push(&mut ids, &[1.0, 2.0]).unwrap();
        let b = relation.push(&mut ids, &[3.0, 4.0]).unwrap();

        assert_eq!(a, DbId::new(100));
        assert_eq!(b, DbId::new(101));
        assert_eq!(relation.offset_of(b), Some(1));
        assert_eq!(relation.get(a), Some(&[1.0, 2.0][..]));
        assert_eq!(relation.get(DbId::new(7)), None);
        assert_eq!(relation.ids(), vec![a, b]);
    }

    #[test]
    fn test_rejects_bad_vectors() {
        let mut ids = IdAllocator::new();
        let mut relation = VectorRelation::new(2).unwrap();
        assert!(matches!(
            relation.push(&mut ids, &[1.0]),
            Err(ProximaError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(relation.push(&mut ids, &[f64::NAN, 0.0]).is_err());
        assert!(VectorRelation::new(0).is_err());
        assert!(matches!(
            VectorRelation::from_points(Vec::<[f64; 2]>::new()),
            Err(ProximaError::EmptyRelation)
        ));
    }

    #[test]
    fn test_distance_query() {
        let relation = VectorRelation::from_points([[0.0, 0.0], [3.0, 4.0]]).unwrap();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        assert_eq!(query.between(DbId::new(0), DbId::new(1)), 5.0);
        assert_eq!(query.to_object(&[0.0, 4.0], DbId::new(1)), 3.0);
    }

    #[test]
    fn test_from_geo_points() {
        let relation =
            VectorRelation::from_geo_points(&[geo::Point::new(1.0, 2.0), geo::Point::new(3.0, 4.0)])
                .unwrap();
        assert_eq!(relation.dimensionality(), 2);
        assert_eq!(relation.object_at(1), &[3.0, 4.0]);
    }
}
