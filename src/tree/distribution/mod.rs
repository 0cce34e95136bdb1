//! Two-way distribution of M-tree node entries between two routing objects.
//!
//! All strategies work on precomputed distance vectors: `dist1[j]` and
//! `dist2[j]` are the distances of entry `j` to the first and second routing
//! object. The routing objects themselves are always placed on their own
//! side, so every entry of the node ends up in the result.

mod assignments;
pub mod balanced;
pub mod farthest_balanced;
pub mod hyperplane;

pub use assignments::{Assignments, DistanceEntry};

use crate::error::{ProximaError, Result};
use crate::tree::entry::MTreeEntry;
use crate::tree::node::Node;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Available distribution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStrategy {
    /// Each entry goes to the closer routing object. No balance guarantee.
    GeneralizedHyperplane,
    /// Both sides alternately take their closest remaining entry.
    #[default]
    Balanced,
    /// Entries are placed farthest first, each side capped at half.
    FarthestBalanced,
}

impl DistributionStrategy {
    /// Whether the strategy guarantees sides differing by at most one entry.
    pub fn is_balanced(&self) -> bool {
        !matches!(self, DistributionStrategy::GeneralizedHyperplane)
    }

    /// Distribute the entries of `node` between the entries at `routing1`
    /// and `routing2`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node holds fewer than two entries, if the
    /// routing indices are out of range or equal, or if the distance vectors
    /// do not match the node size or contain NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use proxima::tree::distribution::DistributionStrategy;
    /// use proxima::tree::entry::MetricEntry;
    /// use proxima::tree::node::Node;
    /// use proxima_types::DbId;
    ///
    /// let positions = [0.0, 1.0, 9.0, 10.0];
    /// let entries = (0..4).map(|i| MetricEntry::leaf(DbId::new(i), 0.0)).collect();
    /// let node = Node::from_entries(entries, 3, true)?;
    /// let dist1: Vec<f64> = positions.iter().map(|p: &f64| p.abs()).collect();
    /// let dist2: Vec<f64> = positions.iter().map(|p: &f64| (p - 10.0).abs()).collect();
    ///
    /// let result = DistributionStrategy::Balanced.distribute(&node, 0, &dist1, 3, &dist2)?;
    /// assert_eq!(result.first().len(), 2);
    /// assert_eq!(result.first_covering_radius(), 1.0);
    /// # Ok::<(), proxima::ProximaError>(())
    /// ```
    pub fn distribute<E: MTreeEntry + Clone>(
        &self,
        node: &Node<E>,
        routing1: usize,
        dist1: &[f64],
        routing2: usize,
        dist2: &[f64],
    ) -> Result<Assignments<E>> {
        let entries = node.entries();
        check_distribution_input(entries.len(), routing1, dist1, routing2, dist2)?;
        let assignments = match self {
            DistributionStrategy::GeneralizedHyperplane => {
                hyperplane::distribute(entries, routing1, dist1, routing2, dist2)
            }
            DistributionStrategy::Balanced => {
                balanced::distribute(entries, routing1, dist1, routing2, dist2)
            }
            DistributionStrategy::FarthestBalanced => {
                farthest_balanced::distribute(entries, routing1, dist1, routing2, dist2)
            }
        };
        debug_assert_eq!(
            assignments.len(),
            entries.len(),
            "{:?} lost entries",
            self
        );
        debug_assert!(
            !self.is_balanced() || assignments.imbalance() <= 1,
            "{:?} produced a {}/{} distribution",
            self,
            assignments.first().len(),
            assignments.second().len()
        );
        Ok(assignments)
    }
}

fn check_distribution_input(
    len: usize,
    routing1: usize,
    dist1: &[f64],
    routing2: usize,
    dist2: &[f64],
) -> Result<()> {
    if len < 2 {
        return Err(ProximaError::InvalidInput(format!(
            "Cannot distribute {} entries between two routing objects",
            len
        )));
    }
    if routing1 >= len || routing2 >= len {
        return Err(ProximaError::InvalidInput(format!(
            "Routing object indices ({}, {}) out of range for {} entries",
            routing1, routing2, len
        )));
    }
    if routing1 == routing2 {
        return Err(ProximaError::InvalidInput(
            "Routing objects must be distinct entries".to_string(),
        ));
    }
    if dist1.len() != len || dist2.len() != len {
        return Err(ProximaError::InvalidInput(format!(
            "Distance vectors have lengths {} and {}, expected {}",
            dist1.len(),
            dist2.len(),
            len
        )));
    }
    if dist1.iter().chain(dist2).any(|d| d.is_nan()) {
        return Err(ProximaError::InvalidInput(
            "Distance vectors must not contain NaN".to_string(),
        ));
    }
    Ok(())
}

/// Place both routing objects on their own side.
pub(crate) fn seed_assignments<E: MTreeEntry + Clone>(
    entries: &[E],
    routing1: usize,
    dist1: &[f64],
    routing2: usize,
    dist2: &[f64],
) -> Assignments<E> {
    let mut assignments = Assignments::new(
        entries[routing1].routing_object_id(),
        entries[routing2].routing_object_id(),
        entries.len(),
    );
    assignments.add_to_first(entries[routing1].clone(), dist1[routing1], routing1);
    assignments.add_to_second(entries[routing2].clone(), dist2[routing2], routing2);
    assignments
}

/// Ascending by distance, ties by index.
pub(crate) fn by_distance(dist: &[f64]) -> impl Fn(&usize, &usize) -> Ordering + '_ {
    move |&a, &b| {
        dist[a]
            .partial_cmp(&dist[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    }
}
