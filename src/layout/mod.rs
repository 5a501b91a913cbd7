//! Layout algorithms for timeline graphs.
//!
//! Every algorithm maps a graph snapshot to a position per node. The set of
//! algorithms is closed: [`LayoutAlgorithm`] holds one configured variant and
//! dispatches `compute` to it, returning exactly the snapshot's node set.

pub mod circular;
pub mod force_atlas;
pub mod grouped;
pub mod radial;
pub mod random;
pub mod spectral;
pub mod spring;
pub mod two_level;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::graph::{NodeId, TemporalGraph};

pub use circular::CircularLayout;
pub use force_atlas::{ForceAtlas2Layout, ForceAtlas2Params};
pub use grouped::{CentralityLayout, CommunityLayout};
pub use radial::RadialLayout;
pub use random::RandomLayout;
pub use spectral::SpectralLayout;
pub use spring::{SpringConfig, SpringLayout};
pub use two_level::{PlacementConfig, TwoLevelPlacement};

/// Position per node. Iteration order carries no meaning.
pub type NodePositions = HashMap<NodeId, (f32, f32)>;

/// A configured layout algorithm.
#[derive(Debug, Clone)]
pub enum LayoutAlgorithm {
    Random(RandomLayout),
    Circular(CircularLayout),
    Radial(RadialLayout),
    Spectral(SpectralLayout),
    Spring(SpringLayout),
    ForceAtlas2(ForceAtlas2Layout),
    Community(CommunityLayout),
    Centrality(CentralityLayout),
    /// Reserved: GPU ForceAtlas2.
    ForceAtlas2Gpu,
    /// Reserved: k-means clustering.
    KMeans,
}

impl LayoutAlgorithm {
    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random(_) => "random",
            Self::Circular(_) => "circular",
            Self::Radial(_) => "twopi",
            Self::Spectral(_) => "spectral",
            Self::Spring(_) => "spring",
            Self::ForceAtlas2(_) => "forceatlas2",
            Self::Community(_) => "louvain",
            Self::Centrality(_) => "katz_centrality",
            Self::ForceAtlas2Gpu => "forceatlas2_gpu",
            Self::KMeans => "kmeans",
        }
    }

    /// Whether this variant only exists as a placeholder.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::ForceAtlas2Gpu | Self::KMeans)
    }

    /// Compute positions with a freshly seeded generator.
    pub fn compute(&self, graph: &TemporalGraph) -> Result<NodePositions> {
        self.compute_with_rng(graph, &mut ChaCha8Rng::from_entropy())
    }

    /// Compute positions drawing randomness from `rng`.
    pub fn compute_with_rng<R: Rng + ?Sized>(
        &self,
        graph: &TemporalGraph,
        rng: &mut R,
    ) -> Result<NodePositions> {
        let _span = tracing::debug_span!(
            "layout",
            algorithm = self.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count()
        )
        .entered();

        let positions = match self {
            Self::Random(layout) => layout.compute(graph, rng),
            Self::Circular(layout) => layout.compute(graph),
            Self::Radial(layout) => layout.compute(graph),
            Self::Spectral(layout) => layout.compute(graph),
            Self::Spring(layout) => layout.compute(graph, rng),
            Self::ForceAtlas2(layout) => layout.compute(graph, rng),
            Self::Community(layout) => layout.compute(graph, rng),
            Self::Centrality(layout) => layout.compute(graph, rng),
            Self::ForceAtlas2Gpu | Self::KMeans => {
                tracing::warn!(algorithm = self.name(), "layout algorithm is reserved");
                return Err(LayoutError::NotImplemented {
                    algorithm: self.name(),
                });
            }
        };

        tracing::debug!(placed = positions.len(), "layout computed");
        Ok(positions)
    }
}

/// Centre `points` on their mean and scale so the largest absolute
/// coordinate equals `scale`.
pub(crate) fn rescale(points: &mut [[f32; 2]], scale: f32) {
    if points.is_empty() {
        return;
    }
    let n = points.len() as f32;
    let mean_x = points.iter().map(|p| p[0]).sum::<f32>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f32>() / n;

    let mut extent = 0.0f32;
    for point in points.iter_mut() {
        point[0] -= mean_x;
        point[1] -= mean_y;
        extent = extent.max(point[0].abs()).max(point[1].abs());
    }

    if extent > 0.0 {
        let factor = scale / extent;
        for point in points.iter_mut() {
            point[0] *= factor;
            point[1] *= factor;
        }
    }
}
