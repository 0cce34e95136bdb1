//! Bounded max-heap accumulating the k best candidates of a query.

use proxima_types::{DbId, DistanceId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
struct Candidate(DistanceId);

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Keeps the `k` smallest `(distance, id)` pairs seen so far.
///
/// The worst retained pair sits on top, so [`kth_distance`] is the pruning
/// bound of a running query: infinite until `k` pairs have been collected,
/// then non-increasing. Equal distances are ordered by id.
///
/// [`kth_distance`]: KnnHeap::kth_distance
#[derive(Debug, Clone)]
pub struct KnnHeap {
    k: usize,
    heap: BinaryHeap<Candidate>,
}

impl KnnHeap {
    /// # Panics
    ///
    /// Panics if `k` is zero.
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "kNN heap size must be greater than zero");
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Offer a candidate. Returns `true` if it was retained.
    pub fn insert(&mut self, distance: f64, id: DbId) -> bool {
        let candidate = Candidate(DistanceId::new(distance, id));
        if self.heap.len() < self.k {
            self.heap.push(candidate);
            return true;
        }
        match self.heap.peek() {
            Some(worst) if candidate < *worst => {
                self.heap.pop();
                self.heap.push(candidate);
                true
            }
            _ => false,
        }
    }

    /// Distance of the current k-th neighbor, infinite while not full.
    pub fn kth_distance(&self) -> f64 {
        if self.heap.len() < self.k {
            return f64::INFINITY;
        }
        self.heap.peek().map_or(f64::INFINITY, |c| c.0.distance)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Retained pairs, nearest first.
    pub fn into_sorted_vec(self) -> Vec<DistanceId> {
        self.heap.into_sorted_vec().into_iter().map(|c| c.0).collect()
    }
}
