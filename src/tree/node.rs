//! Capacity-bounded tree nodes.

use super::entry::NodeEntry;
use super::split::{SplitAssignment, SplitStrategy};
use crate::error::{ProximaError, Result};
use proxima_types::bbox::SpatialComparable;

/// An ordered, capacity-bounded list of homogeneous entries.
///
/// A node may temporarily hold `capacity + 1` entries: that overflow is what
/// triggers a split. All entries are leaf entries in a leaf node and
/// directory entries otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<E> {
    entries: Vec<E>,
    capacity: usize,
    leaf: bool,
}

impl<E: NodeEntry> Node<E> {
    /// Create an empty leaf node. Fails for a zero capacity.
    pub fn new_leaf(capacity: usize) -> Result<Self> {
        Self::new(capacity, true)
    }

    /// Create an empty directory node. Fails for a zero capacity.
    pub fn new_directory(capacity: usize) -> Result<Self> {
        Self::new(capacity, false)
    }

    fn new(capacity: usize, leaf: bool) -> Result<Self> {
        if capacity == 0 {
            return Err(ProximaError::InvalidInput(
                "Node capacity must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
            leaf,
        })
    }

    /// Build a node from existing entries.
    pub fn from_entries(entries: Vec<E>, capacity: usize, leaf: bool) -> Result<Self> {
        let mut node = Self::new(capacity, leaf)?;
        for entry in entries {
            node.add_entry(entry)?;
        }
        Ok(node)
    }

    /// Append an entry, returning its index.
    ///
    /// Fails if the entry kind does not match the node kind, or if the node
    /// is already overflowing.
    pub fn add_entry(&mut self, entry: E) -> Result<usize> {
        if entry.is_leaf_entry() != self.leaf {
            return Err(ProximaError::InvalidInput(format!(
                "Cannot add a {} entry to a {} node",
                if entry.is_leaf_entry() { "leaf" } else { "directory" },
                if self.leaf { "leaf" } else { "directory" },
            )));
        }
        if self.entries.len() > self.capacity {
            return Err(ProximaError::InvalidInput(format!(
                "Node already overflows its capacity of {}",
                self.capacity
            )));
        }
        self.entries.push(entry);
        Ok(self.entries.len() - 1)
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<E> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut E> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn is_overflowing(&self) -> bool {
        self.entries.len() > self.capacity
    }

    pub fn into_entries(self) -> Vec<E> {
        self.entries
    }

    /// Distribute the entries into two new nodes of the same kind and
    /// capacity. Entries with an unset bit go to the first node.
    pub fn split_with(self, assignment: &SplitAssignment) -> Result<(Node<E>, Node<E>)> {
        if assignment.len() != self.entries.len() {
            return Err(ProximaError::InvalidInput(format!(
                "Split assignment covers {} entries, node has {}",
                assignment.len(),
                self.entries.len()
            )));
        }
        let mut first = Self::new(self.capacity, self.leaf)?;
        let mut second = Self::new(self.capacity, self.leaf)?;
        for (i, entry) in self.entries.into_iter().enumerate() {
            if assignment.is_second(i) {
                second.entries.push(entry);
            } else {
                first.entries.push(entry);
            }
        }
        Ok((first, second))
    }
}

impl<E: NodeEntry + SpatialComparable> Node<E> {
    /// Split an overflowing node with a spatial split strategy.
    pub fn split(self, strategy: SplitStrategy, min_entries: usize) -> Result<(Node<E>, Node<E>)> {
        let assignment = strategy.split(&self.entries, min_entries)?;
        self.split_with(&assignment)
    }
}
