//! Circular placement.
//!
//! Nodes sit evenly on the unit circle centred at the origin, in graph
//! insertion order, starting at angle 0 and turning counter-clockwise.

use std::f32::consts::TAU;

use super::NodePositions;
use crate::graph::TemporalGraph;

#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout;

impl CircularLayout {
    pub fn compute(&self, graph: &TemporalGraph) -> NodePositions {
        let count = graph.node_count();
        if count == 1 {
            return graph.nodes().map(|id| (id, (0.0, 0.0))).collect();
        }
        graph
            .nodes()
            .enumerate()
            .map(|(i, id)| {
                let angle = TAU * i as f32 / count as f32;
                (id, (angle.cos(), angle.sin()))
            })
            .collect()
    }
}
