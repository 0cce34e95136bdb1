//! Node-level building blocks for R-tree and M-tree style indexes.
//!
//! Trees own their nodes; this module only provides what happens inside a
//! single node: entries, capacity bookkeeping, and the strategies that
//! split an overflowing node in two.

pub mod distribution;
pub mod entry;
pub mod node;
pub mod promotion;
pub mod split;

pub use distribution::{Assignments, DistanceEntry, DistributionStrategy};
pub use entry::{MTreeEntry, MetricEntry, NodeEntry, NodeId, SpatialEntry};
pub use node::Node;
pub use promotion::{MTreeSplit, Promotion};
pub use split::{SplitAssignment, SplitStrategy};
