//! Node identifiers.
//!
//! Nodes are identified by a stable `u32` that survives time slicing and
//! weighted simplification, so positions computed on a snapshot can be
//! matched back to the full graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
///
/// Ordered so edge endpoints can be canonicalised as `(min, max)` and
/// position arrays can be emitted in a reproducible order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Order an undirected endpoint pair so `(a, b)` and `(b, a)` share a key.
#[inline]
pub fn canonical_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId(42);
        assert_eq!(id.0, 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_id_conversion() {
        let id: NodeId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_canonical_pair_is_order_independent() {
        let a = NodeId(7);
        let b = NodeId(3);
        assert_eq!(canonical_pair(a, b), (b, a));
        assert_eq!(canonical_pair(b, a), (b, a));
        assert_eq!(canonical_pair(a, a), (a, a));
    }
}
