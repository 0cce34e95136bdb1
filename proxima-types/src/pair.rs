use crate::id::DbId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A `(distance, id)` pair.
///
/// Reference lists and query results are sequences of these. Ordering is by
/// distance (IEEE total order), then by id, so sorting is deterministic even
/// with duplicate distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceId {
    pub distance: f64,
    pub id: DbId,
}

impl DistanceId {
    pub fn new(distance: f64, id: DbId) -> Self {
        Self { distance, id }
    }

    /// Total order: distance first, id second.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order_breaks_ties_by_id() {
        let mut pairs = vec![
            DistanceId::new(1.0, DbId::new(7)),
            DistanceId::new(0.5, DbId::new(9)),
            DistanceId::new(1.0, DbId::new(3)),
        ];
        pairs.sort_by(DistanceId::total_cmp);
        let ids: Vec<u32> = pairs.iter().map(|p| p.id.raw()).collect();
        assert_eq!(ids, vec![9, 3, 7]);
    }
}
