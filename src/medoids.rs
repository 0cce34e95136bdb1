//! Reference point (medoid) selection.
//!
//! The iDistance index anchors its sorted distance lists at `k` data points
//! chosen by a [`MedoidInitializer`]. Initializers only see ids and a
//! distance oracle, never coordinates, so they work for any metric space.

use crate::compute::distance::DistanceFunction;
use crate::relation::{DistanceQuery, Relation};
use proxima_types::DbId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Strategy choosing `k` reference points out of a set of ids.
pub trait MedoidInitializer {
    /// Choose up to `k` distinct ids out of `ids`.
    ///
    /// When `k >= ids.len()` every id is returned.
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        ids: &[DbId],
        query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized;
}

/// Uniform random sample without replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomMedoids {
    pub seed: Option<u64>,
}

impl MedoidInitializer for RandomMedoids {
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        ids: &[DbId],
        _query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized,
    {
        if k >= ids.len() {
            return ids.to_vec();
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        rand::seq::index::sample(&mut rng, ids.len(), k)
            .into_iter()
            .map(|i| ids[i])
            .collect()
    }
}

/// The first `k` ids, in order. Deterministic, mostly useful for testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstKMedoids;

impl MedoidInitializer for FirstKMedoids {
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        ids: &[DbId],
        _query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized,
    {
        ids[..k.min(ids.len())].to_vec()
    }
}

/// Greedy farthest-point traversal.
///
/// Starts with the first id, then repeatedly adds the id with the largest
/// distance to its closest already chosen medoid. `O(k·n)` distance calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FarthestFirstMedoids;

impl MedoidInitializer for FarthestFirstMedoids {
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        ids: &[DbId],
        query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized,
    {
        if k >= ids.len() {
            return ids.to_vec();
        }
        let mut medoids = Vec::with_capacity(k);
        if k == 0 {
            return medoids;
        }
        let mut chosen = vec![false; ids.len()];
        let mut nearest = vec![f64::INFINITY; ids.len()];
        let mut current = 0;
        loop {
            chosen[current] = true;
            medoids.push(ids[current]);
            if medoids.len() == k {
                return medoids;
            }
            let mut best = None;
            let mut best_dist = f64::NEG_INFINITY;
            for (i, id) in ids.iter().enumerate() {
                if chosen[i] {
                    continue;
                }
                let d = query.between(ids[current], *id);
                if d < nearest[i] {
                    nearest[i] = d;
                }
                if nearest[i] > best_dist {
                    best_dist = nearest[i];
                    best = Some(i);
                }
            }
            match best {
                Some(i) => current = i,
                None => return medoids,
            }
        }
    }
}

/// The BUILD phase of PAM (Kaufman & Rousseeuw).
///
/// The first medoid minimizes the total distance to all objects; every
/// further medoid is the one reducing the total deviation the most.
/// Quadratic in the number of ids per medoid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PamBuildMedoids;

impl MedoidInitializer for PamBuildMedoids {
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        ids: &[DbId],
        query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized,
    {
        if k >= ids.len() {
            return ids.to_vec();
        }
        let n = ids.len();
        let mut medoids = Vec::with_capacity(k);
        if k == 0 {
            return medoids;
        }
        let mut chosen = vec![false; n];
        // Distance of every object to its nearest medoid so far.
        let mut nearest = vec![f64::INFINITY; n];

        while medoids.len() < k {
            let mut best = None;
            let mut best_cost = f64::INFINITY;
            for c in 0..n {
                if chosen[c] {
                    continue;
                }
                let mut cost = 0.0;
                for j in 0..n {
                    if j == c {
                        continue;
                    }
                    let d = query.between(ids[c], ids[j]);
                    cost += d.min(nearest[j]);
                }
                if cost < best_cost {
                    best_cost = cost;
                    best = Some(c);
                }
            }
            let Some(c) = best else {
                break;
            };
            chosen[c] = true;
            medoids.push(ids[c]);
            nearest[c] = 0.0;
            for j in 0..n {
                if !chosen[j] {
                    nearest[j] = nearest[j].min(query.between(ids[c], ids[j]));
                }
            }
        }
        medoids
    }
}

/// A fixed, caller-chosen list of reference points.
///
/// The candidate ids are ignored; the first `k` stored ids are returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedMedoids {
    ids: Vec<DbId>,
}

impl FixedMedoids {
    pub fn new(ids: Vec<DbId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[DbId] {
        &self.ids
    }
}

impl MedoidInitializer for FixedMedoids {
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        _ids: &[DbId],
        _query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized,
    {
        self.ids[..k.min(self.ids.len())].to_vec()
    }
}

/// Configurable choice of initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initialization {
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    FirstK,
    #[default]
    FarthestFirst,
    PamBuild,
}

impl MedoidInitializer for Initialization {
    fn choose_initial_medoids<R, D>(
        &self,
        k: usize,
        ids: &[DbId],
        query: &DistanceQuery<'_, R, D>,
    ) -> Vec<DbId>
    where
        R: Relation + ?Sized,
        D: DistanceFunction<R::Object> + ?Sized,
    {
        match *self {
            Initialization::Random { seed } => {
                RandomMedoids { seed }.choose_initial_medoids(k, ids, query)
            }
            Initialization::FirstK => FirstKMedoids.choose_initial_medoids(k, ids, query),
            Initialization::FarthestFirst => {
                FarthestFirstMedoids.choose_initial_medoids(k, ids, query)
            }
            Initialization::PamBuild => PamBuildMedoids.choose_initial_medoids(k, ids, query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::distance::EuclideanDistance;
    use crate::relation::VectorRelation;
    use rustc_hash::FxHashSet;

    fn line_relation(n: usize) -> VectorRelation {
        VectorRelation::from_points((0..n).map(|i| [i as f64])).unwrap()
    }

    #[test]
    fn test_k_larger_than_relation_returns_all() {
        let relation = line_relation(3);
        let ids = relation.ids();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        for init in [
            Initialization::Random { seed: Some(1) },
            Initialization::FirstK,
            Initialization::FarthestFirst,
            Initialization::PamBuild,
        ] {
            assert_eq!(init.choose_initial_medoids(10, &ids, &query), ids);
        }
    }

    #[test]
    fn test_random_is_distinct_and_reproducible() {
        let relation = line_relation(50);
        let ids = relation.ids();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        let init = RandomMedoids { seed: Some(42) };
        let a = init.choose_initial_medoids(10, &ids, &query);
        let b = init.choose_initial_medoids(10, &ids, &query);
        assert_eq!(a, b);
        let distinct: FxHashSet<_> = a.iter().collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn test_farthest_first_picks_extremes() {
        let relation = line_relation(11);
        let ids = relation.ids();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        let medoids = FarthestFirstMedoids.choose_initial_medoids(3, &ids, &query);
        // 0 first, then the far end, then the middle.
        assert_eq!(medoids, vec![DbId::new(0), DbId::new(10), DbId::new(5)]);
    }

    #[test]
    fn test_pam_build_starts_at_the_center() {
        let relation = line_relation(9);
        let ids = relation.ids();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        let medoids = PamBuildMedoids.choose_initial_medoids(1, &ids, &query);
        assert_eq!(medoids, vec![DbId::new(4)]);

        let two = PamBuildMedoids.choose_initial_medoids(2, &ids, &query);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0], DbId::new(4));
        assert_ne!(two[1], DbId::new(4));
    }

    #[test]
    fn test_fixed_ignores_candidates() {
        let relation = line_relation(5);
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        let fixed = FixedMedoids::new(vec![DbId::new(4), DbId::new(2)]);
        assert_eq!(
            fixed.choose_initial_medoids(5, &relation.ids(), &query),
            vec![DbId::new(4), DbId::new(2)]
        );
        assert_eq!(fixed.choose_initial_medoids(1, &[], &query), vec![DbId::new(4)]);
    }

    #[test]
    fn test_first_k() {
        let relation = line_relation(5);
        let ids = relation.ids();
        let query = DistanceQuery::new(&relation, &EuclideanDistance);
        assert_eq!(
            FirstKMedoids.choose_initial_medoids(2, &ids, &query),
            vec![DbId::new(0), DbId::new(1)]
        );
    }
}
