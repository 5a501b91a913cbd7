//! Graph analytics feeding the grouped layouts.
//!
//! Community detection and centrality are black boxes to the layouts: each
//! turns a weighted graph into a per-node mapping that the two-level
//! placement then groups by.

pub mod katz;
pub mod louvain;

use std::collections::HashMap;

use crate::graph::{NodeId, WeightedGraph};

pub use katz::{KatzCentrality, KatzConfig};
pub use louvain::{Louvain, LouvainConfig, Partition};

/// Assigns every node to a community.
pub trait CommunityDetection {
    fn partition(&self, graph: &WeightedGraph) -> HashMap<NodeId, u32>;
}

/// Scores every node.
pub trait CentralityMeasure {
    fn scores(&self, graph: &WeightedGraph) -> HashMap<NodeId, f32>;
}
