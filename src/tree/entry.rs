//! Node entries for spatial (R-tree family) and metric (M-tree family) trees.
//!
//! Both entry kinds are tagged unions over leaf entries, which reference a
//! data object, and directory entries, which reference a child node.

use proxima_types::bbox::{HyperBoundingBox, SpatialComparable};
use proxima_types::DbId;
use serde::{Deserialize, Serialize};

/// Identifier of a tree node, assigned by the tree that owns the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Common view of entries stored in a [`Node`](super::node::Node).
pub trait NodeEntry {
    /// `true` for entries referencing data objects, `false` for entries
    /// referencing child nodes.
    fn is_leaf_entry(&self) -> bool;
}

/// The part of an M-tree entry the distribution strategies need.
pub trait MTreeEntry: NodeEntry {
    /// Id of the object this entry is routed by (the data object itself for
    /// leaf entries).
    fn routing_object_id(&self) -> DbId;

    /// Covering radius of the subtree; zero for leaf entries.
    fn covering_radius(&self) -> f64;

    /// Distance to the routing object of the parent node.
    fn parent_distance(&self) -> f64;

    fn set_parent_distance(&mut self, distance: f64);
}

/// Entry of an R-tree style node: a bounding box plus either a data id or a
/// child pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpatialEntry {
    Leaf {
        id: DbId,
        mbr: HyperBoundingBox,
    },
    Directory {
        child: NodeId,
        mbr: HyperBoundingBox,
    },
}

impl SpatialEntry {
    pub fn leaf(id: DbId, mbr: HyperBoundingBox) -> Self {
        SpatialEntry::Leaf { id, mbr }
    }

    pub fn directory(child: NodeId, mbr: HyperBoundingBox) -> Self {
        SpatialEntry::Directory { child, mbr }
    }

    pub fn mbr(&self) -> &HyperBoundingBox {
        match self {
            SpatialEntry::Leaf { mbr, .. } | SpatialEntry::Directory { mbr, .. } => mbr,
        }
    }
}

impl NodeEntry for SpatialEntry {
    fn is_leaf_entry(&self) -> bool {
        matches!(self, SpatialEntry::Leaf { .. })
    }
}

impl SpatialComparable for SpatialEntry {
    fn dimensionality(&self) -> usize {
        self.mbr().dimensionality()
    }

    fn min(&self, dim: usize) -> f64 {
        self.mbr().min(dim)
    }

    fn max(&self, dim: usize) -> f64 {
        self.mbr().max(dim)
    }
}

/// Entry of an M-tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricEntry {
    Leaf {
        id: DbId,
        parent_distance: f64,
    },
    Directory {
        routing_object: DbId,
        child: NodeId,
        covering_radius: f64,
        parent_distance: f64,
    },
}

impl MetricEntry {
    pub fn leaf(id: DbId, parent_distance: f64) -> Self {
        MetricEntry::Leaf {
            id,
            parent_distance,
        }
    }

    pub fn directory(
        routing_object: DbId,
        child: NodeId,
        covering_radius: f64,
        parent_distance: f64,
    ) -> Self {
        MetricEntry::Directory {
            routing_object,
            child,
            covering_radius,
            parent_distance,
        }
    }

    /// Child node of a directory entry.
    pub fn child(&self) -> Option<NodeId> {
        match self {
            MetricEntry::Leaf { .. } => None,
            MetricEntry::Directory { child, .. } => Some(*child),
        }
    }

    pub fn set_covering_radius(&mut self, radius: f64) {
        if let MetricEntry::Directory {
            covering_radius, ..
        } = self
        {
            *covering_radius = radius;
        }
    }
}

impl NodeEntry for MetricEntry {
    fn is_leaf_entry(&self) -> bool {
        matches!(self, MetricEntry::Leaf { .. })
    }
}

impl MTreeEntry for MetricEntry {
    fn routing_object_id(&self) -> DbId {
        match self {
            MetricEntry::Leaf { id, .. } => *id,
            MetricEntry::Directory { routing_object, .. } => *routing_object,
        }
    }

    fn covering_radius(&self) -> f64 {
        match self {
            MetricEntry::Leaf { .. } => 0.0,
            MetricEntry::Directory {
                covering_radius, ..
            } => *covering_radius,
        }
    }

    fn parent_distance(&self) -> f64 {
        match self {
            MetricEntry::Leaf {
                parent_distance, ..
            }
            | MetricEntry::Directory {
                parent_distance, ..
            } => *parent_distance,
        }
    }

    fn set_parent_distance(&mut self, distance: f64) {
        match self {
            MetricEntry::Leaf {
                parent_distance, ..
            }
            | MetricEntry::Directory {
                parent_distance, ..
            } => *parent_distance = distance,
        }
    }
}
