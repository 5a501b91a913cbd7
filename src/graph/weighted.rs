//! WeightedGraph - the simple weighted graph most layouts consume.
//!
//! Spring and force-directed layouts assume at most one edge per node pair;
//! feeding them a multigraph double-counts attraction. Collapsing parallel
//! edges into one edge whose weight is the sum of the collapsed weights
//! (1.0 per unweighted edge) keeps the attraction proportional to the
//! interaction count instead.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

use super::edge::EdgeAttrs;
use super::node::NodeId;
use super::temporal::TemporalGraph;

/// Simple undirected weighted graph with dense `0..n` node indices.
///
/// Dense indices follow the source graph's node insertion order.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    graph: UnGraph<NodeId, f32>,
    index_of: HashMap<NodeId, usize>,
}

impl WeightedGraph {
    /// Collapse the parallel edges of `source`.
    pub fn from_multigraph(source: &TemporalGraph) -> Self {
        let mut graph = UnGraph::with_capacity(source.node_count(), source.edge_count());
        let mut index_of = HashMap::with_capacity(source.node_count());
        for id in source.nodes() {
            let index = graph.add_node(id);
            index_of.insert(id, index.index());
        }

        // BTreeMap keeps the collapsed edge order independent of hashing.
        let mut collapsed: BTreeMap<(usize, usize), f32> = BTreeMap::new();
        for (a, b, attrs) in source.edges() {
            let (ia, ib) = (index_of[&a], index_of[&b]);
            let key = if ia <= ib { (ia, ib) } else { (ib, ia) };
            *collapsed.entry(key).or_insert(0.0) += attrs.effective_weight();
        }

        for ((ia, ib), weight) in collapsed {
            graph.add_edge(NodeIndex::new(ia), NodeIndex::new(ib), weight);
        }

        Self { graph, index_of }
    }

    /// Build a graph directly from dense-index nodes and weighted edges.
    ///
    /// Repeated pairs are summed like parallel edges.
    pub fn from_parts(nodes: &[NodeId], edges: &[(usize, usize, f32)]) -> Self {
        let mut source = TemporalGraph::with_capacity(nodes.len(), edges.len());
        for &id in nodes {
            source.add_node(id);
        }
        for &(a, b, weight) in edges {
            source.add_edge(
                nodes[a],
                nodes[b],
                EdgeAttrs::new().with_weight(weight),
            );
        }
        Self::from_multigraph(&source)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of (collapsed) edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node identifier at dense index `index`.
    pub fn node_id(&self, index: usize) -> NodeId {
        self.graph[NodeIndex::new(index)]
    }

    /// Dense index of `id`, if present.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    /// Node identifiers in dense index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// Edges as `(a, b, weight)` with `a <= b`, in ascending pair order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index(), *edge.weight()))
    }

    /// Collapsed weight between two nodes, if they are adjacent.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f32> {
        let ia = NodeIndex::new(self.index_of(a)?);
        let ib = NodeIndex::new(self.index_of(b)?);
        self.graph
            .find_edge(ia, ib)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    /// Weighted neighbour lists, one entry per incident edge.
    ///
    /// Self-loops appear once in their node's list.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f32)>> {
        let mut neighbors = vec![Vec::new(); self.node_count()];
        for (a, b, weight) in self.edges() {
            neighbors[a].push((b, weight));
            if a != b {
                neighbors[b].push((a, weight));
            }
        }
        neighbors
    }

    /// Number of distinct neighbours of each node, self excluded.
    pub fn distinct_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.node_count()];
        for (a, b, _) in self.edges() {
            if a != b {
                degrees[a] += 1;
                degrees[b] += 1;
            }
        }
        degrees
    }
}
