//! Radial tree layout ("twopi").
//!
//! Each connected component is rooted at its highest-degree node and spanned
//! by a breadth-first tree. A node at depth `d` sits on the ring of radius
//! `d * rank_separation`, inside an angular wedge proportional to the number
//! of leaves below it, so dense subtrees get more of the circle.
//!
//! With more than one component the components split the full circle by
//! leaf count around an empty centre, and every ring moves out by one rank.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use super::NodePositions;
use crate::graph::TemporalGraph;

#[derive(Debug, Clone)]
pub struct RadialLayout {
    /// Distance between consecutive rings (default: 1.0).
    pub rank_separation: f32,
}

impl Default for RadialLayout {
    fn default() -> Self {
        Self {
            rank_separation: 1.0,
        }
    }
}

/// Breadth-first spanning forest over dense node indices.
struct SpanningForest {
    /// BFS order per tree; each starts with its root.
    trees: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
    depth: Vec<u32>,
}

impl SpanningForest {
    fn build(neighbors: &[Vec<usize>]) -> Self {
        let n = neighbors.len();
        let degree = |node: usize| neighbors[node].len();

        // Components first so each tree can start from its best root.
        let mut component_of = vec![usize::MAX; n];
        let mut components: Vec<Vec<usize>> = Vec::new();
        for start in 0..n {
            if component_of[start] != usize::MAX {
                continue;
            }
            let id = components.len();
            component_of[start] = id;
            let mut members = vec![start];
            let mut cursor = 0;
            while let Some(&node) = members.get(cursor) {
                cursor += 1;
                for &next in &neighbors[node] {
                    if component_of[next] == usize::MAX {
                        component_of[next] = id;
                        members.push(next);
                    }
                }
            }
            components.push(members);
        }

        let mut children = vec![Vec::new(); n];
        let mut depth = vec![0u32; n];
        let mut seen = vec![false; n];
        let mut trees = Vec::with_capacity(components.len());

        for members in components {
            // Highest degree wins; ties go to the earliest inserted node.
            let Some(root) = members
                .iter()
                .copied()
                .max_by(|&a, &b| degree(a).cmp(&degree(b)).then(b.cmp(&a)))
            else {
                continue;
            };

            let mut order = Vec::with_capacity(members.len());
            let mut queue = VecDeque::from([root]);
            seen[root] = true;
            while let Some(node) = queue.pop_front() {
                order.push(node);
                for &next in &neighbors[node] {
                    if !seen[next] {
                        seen[next] = true;
                        depth[next] = depth[node] + 1;
                        children[node].push(next);
                        queue.push_back(next);
                    }
                }
            }
            trees.push(order);
        }

        Self {
            trees,
            children,
            depth,
        }
    }

    /// Leaf count below each node, itself included when it is a leaf.
    fn leaf_counts(&self) -> Vec<u32> {
        let mut leaves = vec![0u32; self.children.len()];
        for order in &self.trees {
            for &node in order.iter().rev() {
                leaves[node] = if self.children[node].is_empty() {
                    1
                } else {
                    self.children[node].iter().map(|&c| leaves[c]).sum()
                };
            }
        }
        leaves
    }
}

impl RadialLayout {
    pub fn compute(&self, graph: &TemporalGraph) -> NodePositions {
        let weighted = graph.to_weighted();
        let n = weighted.node_count();
        if n == 0 {
            return NodePositions::new();
        }

        let neighbors: Vec<Vec<usize>> = weighted
            .adjacency()
            .into_iter()
            .enumerate()
            .map(|(node, edges)| {
                let mut list: Vec<usize> = edges
                    .into_iter()
                    .map(|(j, _)| j)
                    .filter(|&j| j != node)
                    .collect();
                list.sort_unstable();
                list
            })
            .collect();

        let forest = SpanningForest::build(&neighbors);
        let leaves = forest.leaf_counts();
        let offset = u32::from(forest.trees.len() > 1);
        let total_leaves: u32 = forest.trees.iter().map(|order| leaves[order[0]]).sum();

        let mut points = vec![[0.0f32; 2]; n];
        let mut wedges = vec![(0.0f32, 0.0f32); n];
        let mut start = 0.0f32;
        for order in &forest.trees {
            let root = order[0];
            let span = TAU * leaves[root] as f32 / total_leaves as f32;
            wedges[root] = (start, span);

            for &node in order {
                let (lo, width) = wedges[node];
                let radius = (forest.depth[node] + offset) as f32 * self.rank_separation;
                let angle = lo + width / 2.0;
                points[node] = [radius * angle.cos(), radius * angle.sin()];

                let mut child_start = lo;
                for &child in &forest.children[node] {
                    let child_width = width * leaves[child] as f32 / leaves[node] as f32;
                    wedges[child] = (child_start, child_width);
                    child_start += child_width;
                }
            }
            start += span;
        }

        points
            .into_iter()
            .enumerate()
            .map(|(index, [x, y])| (weighted.node_id(index), (x, y)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn radius(positions: &NodePositions, id: u32) -> f32 {
        let (x, y) = positions[&NodeId(id)];
        (x * x + y * y).sqrt()
    }

    #[test]
    fn test_star_root_is_centre() {
        let graph = TemporalGraph::from_edges([(1, 0), (0, 2), (0, 3), (0, 4)]);
        let positions = RadialLayout::default().compute(&graph);

        assert_eq!(positions.len(), 5);
        assert!(radius(&positions, 0) < 1e-6);
        for leaf in 1..5 {
            assert!((radius(&positions, leaf) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_depth_maps_to_ring() {
        // 2 is the hub; 4 hangs two levels below it.
        let graph = TemporalGraph::from_edges([(2, 0), (2, 1), (2, 3), (3, 4)]);
        let positions = RadialLayout {
            rank_separation: 2.0,
        }
        .compute(&graph);

        assert!(radius(&positions, 2) < 1e-6);
        assert!((radius(&positions, 3) - 2.0).abs() < 1e-5);
        assert!((radius(&positions, 4) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_components_share_the_circle() {
        let mut graph = TemporalGraph::from_edges([(0, 1), (2, 3)]);
        graph.add_node(NodeId(7));
        let positions = RadialLayout::default().compute(&graph);

        assert_eq!(positions.len(), 5);
        // Roots move to the first ring around an empty centre.
        assert!((radius(&positions, 0) - 1.0).abs() < 1e-5);
        assert!((radius(&positions, 2) - 1.0).abs() < 1e-5);
        assert!((radius(&positions, 7) - 1.0).abs() < 1e-5);
        assert!((radius(&positions, 1) - 2.0).abs() < 1e-5);

        let mut seen: Vec<(i32, i32)> = positions
            .values()
            .map(|&(x, y)| ((x * 1e4) as i32, (y * 1e4) as i32))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 5, "no two nodes share a position");
    }

    #[test]
    fn test_single_node() {
        let mut graph = TemporalGraph::new();
        graph.add_node(NodeId(3));
        let positions = RadialLayout::default().compute(&graph);
        assert_eq!(positions[&NodeId(3)], (0.0, 0.0));
    }
}
