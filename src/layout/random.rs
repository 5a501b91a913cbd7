//! Uniform random placement.
//!
//! Every node gets independent coordinates in `[0, 1) × [0, 1)`. Used as a
//! fallback and as the starting point of the iterative layouts.

use rand::Rng;

use super::NodePositions;
use crate::graph::TemporalGraph;

/// Random layout. No determinism beyond that of the supplied generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomLayout;

impl RandomLayout {
    pub fn compute<R: Rng + ?Sized>(&self, graph: &TemporalGraph, rng: &mut R) -> NodePositions {
        graph
            .nodes()
            .map(|id| (id, (rng.r#gen::<f32>(), rng.r#gen::<f32>())))
            .collect()
    }
}

/// `count` uniform points in the unit square, for seeding iterative layouts.
pub(crate) fn unit_square_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<[f32; 2]> {
    (0..count).map(|_| [rng.r#gen::<f32>(), rng.r#gen::<f32>()]).collect()
}
