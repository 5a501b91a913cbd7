//! TemporalGraph - the time-evolving multigraph layouts are computed over.
//!
//! The topology lives in petgraph's StableGraph (undirected, parallel edges
//! allowed). Every edge may carry a timestep, so a snapshot at time `t` is
//! the edge-induced subgraph of all edges visible at `t`.

use petgraph::Undirected;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use std::collections::HashMap;

use super::edge::EdgeAttrs;
use super::node::NodeId;
use super::weighted::WeightedGraph;

/// Undirected multigraph with optional per-edge timestep and weight.
///
/// Node iteration follows insertion order, which keeps order-sensitive
/// layouts (circular, radial) stable for a given graph.
#[derive(Debug, Clone, Default)]
pub struct TemporalGraph {
    /// Nodes store their stable NodeId, edges store their attributes.
    graph: StableGraph<NodeId, EdgeAttrs, Undirected>,

    /// Map from stable NodeId to petgraph NodeIndex
    node_id_to_index: HashMap<NodeId, NodeIndex>,
}

impl TemporalGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(node_capacity, edge_capacity),
            node_id_to_index: HashMap::with_capacity(node_capacity),
        }
    }

    /// Build a graph from `(source, target)` pairs with default attributes.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge_between(NodeId(a), NodeId(b), EdgeAttrs::new());
        }
        graph
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node. Returns false if it was already present.
    pub fn add_node(&mut self, id: NodeId) -> bool {
        if self.node_id_to_index.contains_key(&id) {
            return false;
        }
        let index = self.graph.add_node(id);
        self.node_id_to_index.insert(id, index);
        true
    }

    /// Whether the node is part of the graph.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_id_to_index.contains_key(&id)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterate node identifiers in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(|index| self.graph[index])
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge between two existing nodes.
    ///
    /// Returns false if either endpoint is missing.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) -> bool {
        let (Some(&ia), Some(&ib)) = (self.node_id_to_index.get(&a), self.node_id_to_index.get(&b))
        else {
            return false;
        };
        self.graph.add_edge(ia, ib, attrs);
        true
    }

    /// Add an edge, inserting missing endpoints first.
    pub fn add_edge_between(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        self.add_node(a);
        self.add_node(b);
        self.add_edge(a, b, attrs);
    }

    /// Add edges from pairs [src0, tgt0, src1, tgt1, ...] sharing `attrs`.
    ///
    /// Returns the number of edges added; pairs with an unknown endpoint are skipped.
    pub fn add_edges_from_pairs(&mut self, pairs: &[u32], attrs: EdgeAttrs) -> u32 {
        pairs
            .chunks_exact(2)
            .filter(|pair| self.add_edge(NodeId(pair[0]), NodeId(pair[1]), attrs))
            .count() as u32
    }

    /// Get the number of edges, counting each parallel edge.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate all edges as `(a, b, attrs)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeAttrs)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (self.graph[edge.source()], self.graph[edge.target()], edge.weight()))
    }

    // =========================================================================
    // Time Slicing
    // =========================================================================

    /// Largest timestep carried by any edge.
    pub fn latest_timestep(&self) -> Option<u32> {
        self.graph
            .edge_weights()
            .filter_map(|attrs| attrs.timestep)
            .max()
    }

    /// The edge-induced snapshot at `timestep`.
    ///
    /// Keeps every edge visible at `timestep` and exactly the nodes those
    /// edges touch, in the original insertion order.
    pub fn snapshot(&self, timestep: u32) -> TemporalGraph {
        let visible: Vec<_> = self
            .graph
            .edge_references()
            .filter(|edge| edge.weight().visible_at(timestep))
            .collect();

        let mut touched = vec![false; self.graph.node_bound()];
        for edge in &visible {
            touched[edge.source().index()] = true;
            touched[edge.target().index()] = true;
        }

        let mut snapshot = TemporalGraph::with_capacity(visible.len(), visible.len());
        for index in self.graph.node_indices() {
            if touched[index.index()] {
                snapshot.add_node(self.graph[index]);
            }
        }
        for edge in visible {
            snapshot.add_edge(
                self.graph[edge.source()],
                self.graph[edge.target()],
                *edge.weight(),
            );
        }
        snapshot
    }

    /// Collapse parallel edges into a simple weighted graph.
    pub fn to_weighted(&self) -> WeightedGraph {
        WeightedGraph::from_multigraph(self)
    }

    /// Clear all nodes and edges.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_id_to_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = TemporalGraph::new();
        assert!(graph.add_node(NodeId(1)));
        assert!(!graph.add_node(NodeId(1)));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = TemporalGraph::new();
        graph.add_node(NodeId(0));
        assert!(!graph.add_edge(NodeId(0), NodeId(1), EdgeAttrs::new()));
        assert_eq!(graph.edge_count(), 0);

        graph.add_node(NodeId(1));
        assert!(graph.add_edge(NodeId(0), NodeId(1), EdgeAttrs::new()));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let graph = TemporalGraph::from_edges([(0, 1), (1, 0), (0, 1)]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.to_weighted().edge_weight(NodeId(0), NodeId(1)), Some(3.0));
    }

    #[test]
    fn test_nodes_follow_insertion_order() {
        let graph = TemporalGraph::from_edges([(5, 2), (9, 5)]);
        let nodes: Vec<_> = graph.nodes().collect();
        assert_eq!(nodes, vec![NodeId(5), NodeId(2), NodeId(9)]);
    }

    #[test]
    fn test_add_edges_from_pairs_skips_unknown() {
        let mut graph = TemporalGraph::new();
        for id in 0..3 {
            graph.add_node(NodeId(id));
        }
        let added = graph.add_edges_from_pairs(&[0, 1, 1, 2, 2, 7], EdgeAttrs::at(1));
        assert_eq!(added, 2);
        assert_eq!(graph.latest_timestep(), Some(1));
    }

    #[test]
    fn test_snapshot_filters_by_timestep() {
        let mut graph = TemporalGraph::new();
        graph.add_edge_between(NodeId(0), NodeId(1), EdgeAttrs::at(1));
        graph.add_edge_between(NodeId(1), NodeId(2), EdgeAttrs::at(2));
        graph.add_edge_between(NodeId(2), NodeId(3), EdgeAttrs::at(3));
        graph.add_edge_between(NodeId(4), NodeId(0), EdgeAttrs::new());

        let early = graph.snapshot(1);
        assert_eq!(early.edge_count(), 2);
        let nodes: Vec<_> = early.nodes().collect();
        assert_eq!(nodes, vec![NodeId(0), NodeId(1), NodeId(4)]);

        let late = graph.snapshot(3);
        assert_eq!(late.edge_count(), 4);
        assert_eq!(late.node_count(), 5);
    }

    #[test]
    fn test_clear() {
        let mut graph = TemporalGraph::from_edges([(0, 1), (1, 2)]);
        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.contains_node(NodeId(0)));
    }
}
