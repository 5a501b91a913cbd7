//! Two-level placement of grouped nodes.
//!
//! **Anchors:** groups become super-nodes whose edge weights are the summed
//! weights of the edges running between them. A spring layout of that group
//! graph places one anchor per group, scaled out by `anchor_scale`.
//!
//! **Members:** each group's nodes fill a disc around its anchor on a
//! sunflower spiral (golden-angle Fermat spiral), which gives a near-uniform
//! density. The disc radius grows with `sqrt(members)` so density stays the
//! same across groups.

use rand::Rng;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::f32::consts::{PI, TAU};

use super::NodePositions;
use super::spring::SpringLayout;
use crate::graph::{NodeId, TemporalGraph, WeightedGraph};

/// Scales used by [`TwoLevelPlacement`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Radius of the anchor layout (default: 3.0).
    pub anchor_scale: f32,
    /// Spacing between members of one group (default: 0.15).
    pub member_spacing: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            anchor_scale: 3.0,
            member_spacing: 0.15,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TwoLevelPlacement {
    pub config: PlacementConfig,
    pub anchors: SpringLayout,
}

impl TwoLevelPlacement {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            anchors: SpringLayout::default(),
        }
    }

    /// Place every node of `graph` around the anchor of its group.
    ///
    /// Nodes missing from `grouping` each form a group of their own.
    pub fn layout<R: Rng + ?Sized>(
        &self,
        graph: &TemporalGraph,
        grouping: &HashMap<NodeId, u32>,
        rng: &mut R,
    ) -> NodePositions {
        let weighted = graph.to_weighted();
        if weighted.is_empty() {
            return NodePositions::new();
        }

        // Dense group ids in label order; ungrouped nodes are appended after.
        let labels: BTreeSet<u32> = weighted
            .nodes()
            .filter_map(|id| grouping.get(&id).copied())
            .collect();
        let dense: HashMap<u32, usize> = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| (label, index))
            .collect();
        let mut group_count = dense.len();
        let group_of: Vec<usize> = weighted
            .nodes()
            .map(|id| match grouping.get(&id) {
                Some(label) => dense[label],
                None => {
                    group_count += 1;
                    group_count - 1
                }
            })
            .collect();

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); group_count];
        for (node, &group) in group_of.iter().enumerate() {
            members[group].push(node);
        }

        let anchors = self.anchor_positions(&weighted, &group_of, group_count, rng);

        let mut positions = NodePositions::with_capacity(weighted.node_count());
        for (group, nodes) in members.iter().enumerate() {
            let [cx, cy] = anchors[group];
            let radius = group_radius(nodes.len(), self.config.member_spacing);
            for (node, (x, y)) in nodes.iter().zip(sunflower(nodes.len(), cx, cy, radius)) {
                positions.insert(weighted.node_id(*node), (x, y));
            }
        }
        positions
    }

    fn anchor_positions<R: Rng + ?Sized>(
        &self,
        graph: &WeightedGraph,
        group_of: &[usize],
        group_count: usize,
        rng: &mut R,
    ) -> Vec<[f32; 2]> {
        let group_ids: Vec<NodeId> = (0..group_count as u32).map(NodeId).collect();
        let between: Vec<(usize, usize, f32)> = graph
            .edges()
            .filter(|&(a, b, _)| group_of[a] != group_of[b])
            .map(|(a, b, weight)| (group_of[a], group_of[b], weight))
            .collect();
        let groups = WeightedGraph::from_parts(&group_ids, &between);

        let mut anchors = self.anchors.layout_weighted(&groups, rng);
        for anchor in &mut anchors {
            anchor[0] *= self.config.anchor_scale;
            anchor[1] *= self.config.anchor_scale;
        }
        anchors
    }
}

/// Disc radius that fits `n` members at `spacing`: π r² = n s².
fn group_radius(n: usize, spacing: f32) -> f32 {
    if n <= 1 {
        return 0.0;
    }
    spacing * (n as f32 / PI).sqrt()
}

/// Sunflower spiral of `n` points around `(cx, cy)` within `radius`.
fn sunflower(n: usize, cx: f32, cy: f32, radius: f32) -> impl Iterator<Item = (f32, f32)> {
    let golden_angle = TAU / (1.0 + 5.0f32.sqrt());
    (0..n).map(move |i| {
        if n == 1 {
            return (cx, cy);
        }
        let t = (i as f32 + 0.5) / n as f32;
        let r = radius * t.sqrt();
        let theta = i as f32 * golden_angle;
        (cx + r * theta.cos(), cy + r * theta.sin())
    })
}
