//! Routing object promotion for overflowing M-tree nodes.
//!
//! A promotion picks two entries of the node as new routing objects,
//! computes the distance of every entry to both, and hands the result to a
//! [`DistributionStrategy`].

use super::distribution::{Assignments, DistributionStrategy};
use super::entry::MTreeEntry;
use super::node::Node;
use crate::error::{ProximaError, Result};
use proxima_types::DbId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How the two routing objects of a split are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Promotion {
    /// Two distinct entries drawn at random.
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// The pair of entries with the largest distance. Quadratic.
    FarthestPoints,
    /// The first entry and the entry farthest from it. Linear.
    #[serde(rename = "mlb_dist")]
    MLBDist,
    /// Try every pair and keep the one minimizing the larger of the two
    /// covering radii. Quadratic pairs, each followed by a distribution.
    #[default]
    MinMaxRadius,
}

/// Outcome of an M-tree node split.
#[derive(Debug, Clone, PartialEq)]
pub struct MTreeSplit<E> {
    pub assignments: Assignments<E>,
}

impl<E: MTreeEntry + Clone> MTreeSplit<E> {
    fn new(assignments: Assignments<E>) -> Self {
        Self { assignments }
    }

    /// Covering radius of the first side.
    pub fn first_radius(&self) -> f64 {
        self.assignments.first_covering_radius()
    }

    /// Covering radius of the second side.
    pub fn second_radius(&self) -> f64 {
        self.assignments.second_covering_radius()
    }

    /// Larger of the two covering radii.
    pub fn max_radius(&self) -> f64 {
        self.first_radius().max(self.second_radius())
    }

    /// Materialize both sides as nodes with the given capacity.
    pub fn into_nodes(self, capacity: usize, leaf: bool) -> Result<(Node<E>, Node<E>)> {
        let (first, second) = self.assignments.into_parts();
        let first = Node::from_entries(first.into_iter().map(|e| e.into_entry()).collect(), capacity, leaf)?;
        let second = Node::from_entries(second.into_iter().map(|e| e.into_entry()).collect(), capacity, leaf)?;
        Ok((first, second))
    }
}

impl Promotion {
    /// Split `node`, measuring distances between routing objects with
    /// `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node holds fewer than two entries.
    pub fn split<E, F>(
        &self,
        node: &Node<E>,
        distribution: DistributionStrategy,
        distance: F,
    ) -> Result<MTreeSplit<E>>
    where
        E: MTreeEntry + Clone,
        F: Fn(DbId, DbId) -> f64,
    {
        match *self {
            Promotion::Random { seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                self.split_with_rng(node, distribution, distance, &mut rng)
            }
            _ => self.split_with_rng(node, distribution, distance, &mut rand::thread_rng()),
        }
    }

    /// Like [`split`](Promotion::split), drawing random routing objects
    /// from `rng`.
    pub fn split_with_rng<E, F, G>(
        &self,
        node: &Node<E>,
        distribution: DistributionStrategy,
        distance: F,
        rng: &mut G,
    ) -> Result<MTreeSplit<E>>
    where
        E: MTreeEntry + Clone,
        F: Fn(DbId, DbId) -> f64,
        G: Rng + ?Sized,
    {
        let n = node.len();
        if n < 2 {
            return Err(ProximaError::InvalidInput(format!(
                "Cannot promote two routing objects out of {} entries",
                n
            )));
        }
        let ids: Vec<DbId> = node.entries().iter().map(|e| e.routing_object_id()).collect();

        let assignments = match self {
            Promotion::Random { .. } => {
                let picked = rand::seq::index::sample(rng, n, 2);
                let (r1, r2) = (picked.index(0), picked.index(1));
                distribute_between(node, &ids, &distance, r1, r2, distribution)?
            }
            Promotion::MLBDist => {
                let row = distances_from(&ids, 0, &distance);
                let r2 = farthest(&row, 0);
                distribution.distribute(node, 0, &row, r2, &distances_from(&ids, r2, &distance))?
            }
            Promotion::FarthestPoints => {
                let matrix = distance_matrix(&ids, &distance);
                let (mut r1, mut r2, mut best) = (0, 1, f64::NEG_INFINITY);
                for i in 0..n {
                    for j in (i + 1)..n {
                        if matrix[i][j] > best {
                            (r1, r2, best) = (i, j, matrix[i][j]);
                        }
                    }
                }
                distribution.distribute(node, r1, &matrix[r1], r2, &matrix[r2])?
            }
            Promotion::MinMaxRadius => {
                let matrix = distance_matrix(&ids, &distance);
                let mut best: Option<Assignments<E>> = None;
                let mut best_radius = f64::INFINITY;
                for i in 0..n {
                    for j in (i + 1)..n {
                        let candidate = distribution.distribute(node, i, &matrix[i], j, &matrix[j])?;
                        let radius = candidate
                            .first_covering_radius()
                            .max(candidate.second_covering_radius());
                        if best.is_none() || radius < best_radius {
                            best_radius = radius;
                            best = Some(candidate);
                        }
                    }
                }
                match best {
                    Some(assignments) => assignments,
                    None => distribute_between(node, &ids, &distance, 0, 1, distribution)?,
                }
            }
        };
        Ok(MTreeSplit::new(assignments))
    }
}

fn distribute_between<E, F>(
    node: &Node<E>,
    ids: &[DbId],
    distance: &F,
    r1: usize,
    r2: usize,
    distribution: DistributionStrategy,
) -> Result<Assignments<E>>
where
    E: MTreeEntry + Clone,
    F: Fn(DbId, DbId) -> f64,
{
    let dist1 = distances_from(ids, r1, distance);
    let dist2 = distances_from(ids, r2, distance);
    distribution.distribute(node, r1, &dist1, r2, &dist2)
}

fn distances_from<F: Fn(DbId, DbId) -> f64>(ids: &[DbId], from: usize, distance: &F) -> Vec<f64> {
    ids.iter()
        .enumerate()
        .map(|(j, id)| if j == from { 0.0 } else { distance(ids[from], *id) })
        .collect()
}

fn distance_matrix<F: Fn(DbId, DbId) -> f64>(ids: &[DbId], distance: &F) -> Vec<Vec<f64>> {
    let n = ids.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance(ids[i], ids[j]);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}

/// Index of the largest entry of `row` other than `skip`.
fn farthest(row: &[f64], skip: usize) -> usize {
    let mut best = if skip == 0 { 1 } else { 0 };
    for (j, d) in row.iter().enumerate() {
        if j != skip && *d > row[best] {
            best = j;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::entry::MetricEntry;

    const POSITIONS: [f64; 6] = [3.0, 0.0, 1.0, 10.0, 11.0, 12.0];

    fn line_node() -> Node<MetricEntry> {
        let entries = (0..POSITIONS.len() as u32)
            .map(|i| MetricEntry::leaf(DbId::new(i), 0.0))
            .collect();
        Node::from_entries(entries, 5, true).unwrap()
    }

    fn line_distance(a: DbId, b: DbId) -> f64 {
        (POSITIONS[a.raw() as usize] - POSITIONS[b.raw() as usize]).abs()
    }

    fn side(split: &MTreeSplit<MetricEntry>, first: bool) -> Vec<DbId> {
        let entries = if first {
            split.assignments.first()
        } else {
            split.assignments.second()
        };
        let mut ids: Vec<DbId> = entries.iter().map(|e| e.entry().routing_object_id()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_farthest_points_picks_extremes() {
        let split = Promotion::FarthestPoints
            .split(&line_node(), DistributionStrategy::GeneralizedHyperplane, line_distance)
            .unwrap();
        assert_eq!(split.assignments.first_routing_object(), DbId::new(1));
        assert_eq!(split.assignments.second_routing_object(), DbId::new(5));
        assert_eq!(side(&split, true), vec![DbId::new(0), DbId::new(1), DbId::new(2)]);
        assert_eq!(split.first_radius(), 3.0);
        assert_eq!(split.second_radius(), 2.0);
    }

    #[test]
    fn test_radii_follow_assignments() {
        let mut split = Promotion::FarthestPoints
            .split(&line_node(), DistributionStrategy::Balanced, line_distance)
            .unwrap();
        assert_eq!(split.first_radius(), split.assignments.first_covering_radius());
        assert_eq!(split.second_radius(), split.assignments.second_covering_radius());

        split
            .assignments
            .add_to_second(MetricEntry::leaf(DbId::new(9), 0.0), 7.5, 6);
        assert_eq!(split.second_radius(), 7.5);
        assert_eq!(split.max_radius(), 7.5);
    }

    #[test]
    fn test_mlb_dist_starts_at_first_entry() {
        let split = Promotion::MLBDist
            .split(&line_node(), DistributionStrategy::Balanced, line_distance)
            .unwrap();
        assert_eq!(split.assignments.first_routing_object(), DbId::new(0));
        assert_eq!(split.assignments.second_routing_object(), DbId::new(5));
        assert_eq!(split.assignments.imbalance(), 0);
    }

    #[test]
    fn test_min_max_radius_is_optimal() {
        let split = Promotion::MinMaxRadius
            .split(&line_node(), DistributionStrategy::GeneralizedHyperplane, line_distance)
            .unwrap();
        // Routing at 1.0 and 11.0 covers both clusters with radius 2.
        assert_eq!(split.max_radius(), 2.0);
        assert_eq!(side(&split, true), vec![DbId::new(0), DbId::new(1), DbId::new(2)]);
        assert_eq!(side(&split, false), vec![DbId::new(3), DbId::new(4), DbId::new(5)]);
    }

    #[test]
    fn test_random_is_reproducible() {
        let promotion = Promotion::Random { seed: Some(5) };
        let a = promotion
            .split(&line_node(), DistributionStrategy::Balanced, line_distance)
            .unwrap();
        let b = promotion
            .split(&line_node(), DistributionStrategy::Balanced, line_distance)
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(
            a.assignments.first_routing_object(),
            a.assignments.second_routing_object()
        );
    }

    #[test]
    fn test_into_nodes() {
        let split = Promotion::FarthestPoints
            .split(&line_node(), DistributionStrategy::Balanced, line_distance)
            .unwrap();
        let (a, b) = split.into_nodes(5, true).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
        assert!(a.entries().iter().all(|e| e.parent_distance() <= 3.0));
    }

    #[test]
    fn test_rejects_single_entry() {
        let node = Node::from_entries(vec![MetricEntry::leaf(DbId::new(0), 0.0)], 4, true).unwrap();
        assert!(Promotion::MLBDist
            .split(&node, DistributionStrategy::Balanced, line_distance)
            .is_err());
    }
}
