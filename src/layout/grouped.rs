//! Layouts that group nodes by an analytic before placing them.
//!
//! Both run the analytic on the simplified graph and hand the resulting
//! grouping to [`TwoLevelPlacement`].

use rand::Rng;
use std::collections::{BTreeSet, HashMap};

use super::NodePositions;
use super::two_level::TwoLevelPlacement;
use crate::algorithms::{CentralityMeasure, CommunityDetection, KatzCentrality, Louvain};
use crate::graph::{NodeId, TemporalGraph};

/// Groups nodes by detected community.
#[derive(Debug, Clone, Default)]
pub struct CommunityLayout<D = Louvain> {
    pub detector: D,
    pub placement: TwoLevelPlacement,
}

impl<D: CommunityDetection> CommunityLayout<D> {
    pub fn compute<R: Rng + ?Sized>(&self, graph: &TemporalGraph, rng: &mut R) -> NodePositions {
        let grouping = self.detector.partition(&graph.to_weighted());
        tracing::debug!(
            groups = grouping.values().collect::<BTreeSet<_>>().len(),
            "community grouping"
        );
        self.placement.layout(graph, &grouping, rng)
    }
}

/// Groups nodes into equal-width bands of a centrality score.
#[derive(Debug, Clone)]
pub struct CentralityLayout<C = KatzCentrality> {
    pub measure: C,
    /// Number of score bands (default: 8).
    pub bands: u32,
    pub placement: TwoLevelPlacement,
}

impl<C: Default> Default for CentralityLayout<C> {
    fn default() -> Self {
        Self {
            measure: C::default(),
            bands: 8,
            placement: TwoLevelPlacement::default(),
        }
    }
}

impl<C: CentralityMeasure> CentralityLayout<C> {
    pub fn compute<R: Rng + ?Sized>(&self, graph: &TemporalGraph, rng: &mut R) -> NodePositions {
        let scores = self.measure.scores(&graph.to_weighted());
        let grouping = band_scores(&scores, self.bands);
        self.placement.layout(graph, &grouping, rng)
    }
}

/// Split `[min, max]` into `bands` equal-width bands; the max lands in the top band.
///
/// Equal scores share band 0.
fn band_scores(scores: &HashMap<NodeId, f32>, bands: u32) -> HashMap<NodeId, u32> {
    let bands = bands.max(1);
    let (lo, hi) = scores
        .values()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    let width = hi - lo;

    scores
        .iter()
        .map(|(&id, &score)| {
            let band = if width > f32::EPSILON {
                (((score - lo) / width * bands as f32) as u32).min(bands - 1)
            } else {
                0
            };
            (id, band)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_band_scores() {
        let scores: HashMap<NodeId, f32> = [(0, 0.0), (1, 0.49), (2, 0.51), (3, 1.0)]
            .into_iter()
            .map(|(id, s)| (NodeId(id), s))
            .collect();
        let bands = band_scores(&scores, 2);
        assert_eq!(bands[&NodeId(0)], 0);
        assert_eq!(bands[&NodeId(1)], 0);
        assert_eq!(bands[&NodeId(2)], 1);
        assert_eq!(bands[&NodeId(3)], 1);

        let flat: HashMap<NodeId, f32> = (0..3).map(|id| (NodeId(id), 0.3)).collect();
        assert!(band_scores(&flat, 8).values().all(|&b| b == 0));
    }

    #[test]
    fn test_community_layout_covers_graph() {
        let graph = TemporalGraph::from_edges([
            (0, 1),
            (1, 2),
            (2, 0),
            (3, 4),
            (4, 5),
            (5, 3),
            (2, 3),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let positions = CommunityLayout::<Louvain>::default().compute(&graph, &mut rng);
        assert_eq!(positions.len(), 6);
        assert!(positions.values().all(|&(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn test_centrality_layout_covers_graph() {
        let graph = TemporalGraph::from_edges([(0, 1), (0, 2), (0, 3), (3, 4), (4, 5)]);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let positions = CentralityLayout::<KatzCentrality>::default().compute(&graph, &mut rng);
        assert_eq!(positions.len(), 6);
        assert!(positions.values().all(|&(x, y)| x.is_finite() && y.is_finite()));
    }
}
