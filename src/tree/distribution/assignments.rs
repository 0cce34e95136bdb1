//! Result type of a two-way M-tree distribution.

use crate::tree::entry::MTreeEntry;
use proxima_types::DbId;

/// An entry together with its distance to the routing object of the side it
/// was assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceEntry<E> {
    entry: E,
    distance: f64,
    index: usize,
}

impl<E> DistanceEntry<E> {
    pub fn entry(&self) -> &E {
        &self.entry
    }

    /// Distance to the routing object of its side.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Position of the entry in the node that was distributed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn into_entry(self) -> E {
        self.entry
    }
}

/// Two disjoint entry lists, each anchored at a routing object.
///
/// Entries are stored in assignment order and carry their distance to the
/// routing object, which is also written into the entry's parent distance.
/// Both routing objects are members of their own side.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignments<E> {
    first_routing: DbId,
    second_routing: DbId,
    first: Vec<DistanceEntry<E>>,
    second: Vec<DistanceEntry<E>>,
    first_radius: f64,
    second_radius: f64,
}

impl<E: MTreeEntry> Assignments<E> {
    pub(crate) fn new(first_routing: DbId, second_routing: DbId, capacity: usize) -> Self {
        Self {
            first_routing,
            second_routing,
            first: Vec::with_capacity(capacity),
            second: Vec::with_capacity(capacity),
            first_radius: 0.0,
            second_radius: 0.0,
        }
    }

    pub(crate) fn add_to_first(&mut self, entry: E, distance: f64, index: usize) {
        self.first_radius = self.first_radius.max(reach(&entry, distance));
        self.first.push(annotate(entry, distance, index));
    }

    pub(crate) fn add_to_second(&mut self, entry: E, distance: f64, index: usize) {
        self.second_radius = self.second_radius.max(reach(&entry, distance));
        self.second.push(annotate(entry, distance, index));
    }

    pub fn first_routing_object(&self) -> DbId {
        self.first_routing
    }

    pub fn second_routing_object(&self) -> DbId {
        self.second_routing
    }

    pub fn first(&self) -> &[DistanceEntry<E>] {
        &self.first
    }

    pub fn second(&self) -> &[DistanceEntry<E>] {
        &self.second
    }

    /// Covering radius of the first side: the largest distance of an
    /// assigned entry plus, for directory entries, its own covering radius.
    pub fn first_covering_radius(&self) -> f64 {
        self.first_radius
    }

    pub fn second_covering_radius(&self) -> f64 {
        self.second_radius
    }

    /// Total number of assigned entries.
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }

    /// Size difference between the two sides.
    pub fn imbalance(&self) -> usize {
        self.first.len().abs_diff(self.second.len())
    }

    pub fn into_parts(self) -> (Vec<DistanceEntry<E>>, Vec<DistanceEntry<E>>) {
        (self.first, self.second)
    }
}

fn reach<E: MTreeEntry>(entry: &E, distance: f64) -> f64 {
    if entry.is_leaf_entry() {
        distance
    } else {
        distance + entry.covering_radius()
    }
}

fn annotate<E: MTreeEntry>(mut entry: E, distance: f64, index: usize) -> DistanceEntry<E> {
    entry.set_parent_distance(distance);
    DistanceEntry {
        entry,
        distance,
        index,
    }
}
