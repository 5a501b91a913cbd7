//! Position arrays and edge segment geometry.
//!
//! Rendering consumes parallel arrays, not maps. [`PositionArrays`] freezes
//! a position map into `nodes`/`x`/`y` arrays built together so their
//! indices always align, and [`EdgeProjector`] turns those arrays plus the
//! graph's edges into one line segment per unique undirected edge.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::graph::{NodeId, TemporalGraph, canonical_pair};
use crate::layout::NodePositions;

/// Node positions as parallel arrays, ordered by ascending node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionArrays {
    pub nodes: Vec<NodeId>,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl PositionArrays {
    pub fn from_positions(positions: &NodePositions) -> Self {
        let mut entries: Vec<(NodeId, (f32, f32))> =
            positions.iter().map(|(&id, &xy)| (id, xy)).collect();
        entries.sort_unstable_by_key(|&(id, _)| id);

        let mut arrays = Self {
            nodes: Vec::with_capacity(entries.len()),
            x: Vec::with_capacity(entries.len()),
            y: Vec::with_capacity(entries.len()),
        };
        for (id, (x, y)) in entries {
            arrays.nodes.push(id);
            arrays.x.push(x);
            arrays.y.push(y);
        }
        arrays
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One segment per unique undirected edge.
///
/// `xs[i]` / `ys[i]` hold the segment's endpoint coordinates; `x0`/`y0` are
/// the first endpoints and `x1`/`y1` the second, as flat arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeGeometry {
    pub xs: Vec<[f32; 2]>,
    pub ys: Vec<[f32; 2]>,
    pub x0: Vec<f32>,
    pub x1: Vec<f32>,
    pub y0: Vec<f32>,
    pub y1: Vec<f32>,
}

impl EdgeGeometry {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Label anchor x: `x0 + 0.5`.
    pub fn cx0(&self) -> Vec<f32> {
        self.x0.iter().map(|x| x + 0.5).collect()
    }
}

/// Projects node positions onto edge segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeProjector;

impl EdgeProjector {
    /// Build segment geometry for every unique edge of `graph`.
    ///
    /// `node_order`, `x` and `y` must have equal lengths, and every edge
    /// endpoint must appear in `node_order`.
    pub fn project(
        &self,
        graph: &TemporalGraph,
        node_order: &[NodeId],
        x: &[f32],
        y: &[f32],
    ) -> Result<EdgeGeometry> {
        if node_order.len() != x.len() || node_order.len() != y.len() {
            return Err(LayoutError::MisalignedArrays {
                nodes: node_order.len(),
                x: x.len(),
                y: y.len(),
            });
        }

        let _span = tracing::debug_span!("project_edges", edges = graph.edge_count()).entered();

        let mut pairs: Vec<(NodeId, NodeId)> =
            graph.edges().map(|(a, b, _)| canonical_pair(a, b)).collect();
        pairs.sort_unstable();
        pairs.dedup();

        let index_of: HashMap<NodeId, usize> = node_order
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();
        let lookup = |node: NodeId| {
            index_of
                .get(&node)
                .copied()
                .ok_or(LayoutError::InconsistentSnapshot { node })
        };

        let mut geometry = EdgeGeometry {
            xs: Vec::with_capacity(pairs.len()),
            ys: Vec::with_capacity(pairs.len()),
            x0: Vec::with_capacity(pairs.len()),
            x1: Vec::with_capacity(pairs.len()),
            y0: Vec::with_capacity(pairs.len()),
            y1: Vec::with_capacity(pairs.len()),
        };
        for (a, b) in pairs {
            let (ia, ib) = (lookup(a)?, lookup(b)?);
            geometry.xs.push([x[ia], x[ib]]);
            geometry.ys.push([y[ia], y[ib]]);
            geometry.x0.push(x[ia]);
            geometry.x1.push(x[ib]);
            geometry.y0.push(y[ia]);
            geometry.y1.push(y[ib]);
        }

        tracing::debug!(segments = geometry.len(), "edges projected");
        Ok(geometry)
    }

    /// Project straight from [`PositionArrays`].
    pub fn project_arrays(
        &self,
        graph: &TemporalGraph,
        arrays: &PositionArrays,
    ) -> Result<EdgeGeometry> {
        self.project(graph, &arrays.nodes, &arrays.x, &arrays.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeAttrs;

    fn line_positions() -> NodePositions {
        [(0, (0.0, 0.0)), (1, (1.0, 2.0)), (2, (3.0, 4.0))]
            .into_iter()
            .map(|(id, xy)| (NodeId(id), xy))
            .collect()
    }

    #[test]
    fn test_arrays_are_sorted_and_aligned() {
        let arrays = PositionArrays::from_positions(&line_positions());
        assert_eq!(arrays.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(arrays.x, vec![0.0, 1.0, 3.0]);
        assert_eq!(arrays.y, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_duplicate_and_reversed_edges_project_once() {
        let graph = TemporalGraph::from_edges([(0, 1), (1, 0), (0, 1)]);
        let arrays = PositionArrays::from_positions(&line_positions());
        let geometry = EdgeProjector.project_arrays(&graph, &arrays).unwrap();

        assert_eq!(geometry.len(), 1);
        assert_eq!(geometry.xs, vec![[0.0, 1.0]]);
        assert_eq!(geometry.ys, vec![[0.0, 2.0]]);
        assert_eq!(geometry.cx0(), vec![0.5]);
    }

    #[test]
    fn test_segments_follow_canonical_order() {
        let graph = TemporalGraph::from_edges([(2, 1), (1, 0)]);
        let arrays = PositionArrays::from_positions(&line_positions());
        let geometry = EdgeProjector.project_arrays(&graph, &arrays).unwrap();

        assert_eq!(geometry.x0, vec![0.0, 1.0]);
        assert_eq!(geometry.x1, vec![1.0, 3.0]);
        assert_eq!(geometry.y0, vec![0.0, 2.0]);
        assert_eq!(geometry.y1, vec![2.0, 4.0]);
    }

    #[test]
    fn test_unknown_endpoint_is_rejected() {
        let mut graph = TemporalGraph::from_edges([(0, 1)]);
        graph.add_edge_between(NodeId(1), NodeId(9), EdgeAttrs::new());
        let arrays = PositionArrays::from_positions(&line_positions());

        match EdgeProjector.project_arrays(&graph, &arrays) {
            Err(LayoutError::InconsistentSnapshot { node }) => assert_eq!(node, NodeId(9)),
            other => panic!("expected InconsistentSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_misaligned_arrays_are_rejected() {
        let graph = TemporalGraph::from_edges([(0, 1)]);
        let result = EdgeProjector.project(&graph, &[NodeId(0), NodeId(1)], &[0.0, 1.0], &[0.0]);
        assert!(matches!(
            result,
            Err(LayoutError::MisalignedArrays { nodes: 2, x: 2, y: 1 })
        ));
    }

    #[test]
    fn test_graph_without_edges() {
        let arrays = PositionArrays::from_positions(&line_positions());
        let geometry = EdgeProjector
            .project_arrays(&TemporalGraph::new(), &arrays)
            .unwrap();
        assert!(geometry.is_empty());
    }
}
