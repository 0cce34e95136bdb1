//! Query results.

use proxima_types::{DbId, DistanceId};

/// Nearest neighbors of a query, nearest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnnResult {
    neighbors: Vec<DistanceId>,
    refinements: usize,
}

impl KnnResult {
    pub(crate) fn new(neighbors: Vec<DistanceId>, refinements: usize) -> Self {
        debug_assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
        Self {
            neighbors,
            refinements,
        }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn ids(&self) -> Vec<DbId> {
        self.neighbors.iter().map(|n| n.id).collect()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.neighbors.iter().map(|n| n.distance).collect()
    }

    /// Distance of the farthest returned neighbor.
    pub fn kth_distance(&self) -> Option<f64> {
        self.neighbors.last().map(|n| n.distance)
    }

    /// Number of exact distance computations against candidate points.
    /// Distances to reference points are not counted.
    pub fn refinements(&self) -> usize {
        self.refinements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistanceId> {
        self.neighbors.iter()
    }

    pub fn as_slice(&self) -> &[DistanceId] {
        &self.neighbors
    }

    pub fn into_vec(self) -> Vec<DistanceId> {
        self.neighbors
    }
}

impl IntoIterator for KnnResult {
    type Item = DistanceId;
    type IntoIter = std::vec::IntoIter<DistanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.into_iter()
    }
}

impl<'a> IntoIterator for &'a KnnResult {
    type Item = &'a DistanceId;
    type IntoIter = std::slice::Iter<'a, DistanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}

/// Points within a query radius, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeResult {
    matches: Vec<DistanceId>,
    refinements: usize,
}

impl RangeResult {
    pub(crate) fn new(matches: Vec<DistanceId>, refinements: usize) -> Self {
        Self {
            matches,
            refinements,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn ids(&self) -> Vec<DbId> {
        self.matches.iter().map(|m| m.id).collect()
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.matches.iter().any(|m| m.id == id)
    }

    pub fn refinements(&self) -> usize {
        self.refinements
    }

    /// Order matches nearest first, ties by id.
    pub fn sort_by_distance(&mut self) {
        self.matches.sort_by(DistanceId::total_cmp);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistanceId> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[DistanceId] {
        &self.matches
    }

    pub fn into_vec(self) -> Vec<DistanceId> {
        self.matches
    }
}

impl IntoIterator for RangeResult {
    type Item = DistanceId;
    type IntoIter = std::vec::IntoIter<DistanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}
