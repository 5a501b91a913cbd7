//! Spectral embedding.
//!
//! Coordinates come from the eigenvectors of the two smallest non-trivial
//! eigenvalues of the weighted graph Laplacian `L = D − A`, then get
//! rescaled so the largest coordinate magnitude is 1 around the centroid.

use nalgebra::{DMatrix, SymmetricEigen};

use super::{NodePositions, rescale};
use crate::graph::TemporalGraph;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralLayout;

impl SpectralLayout {
    pub fn compute(&self, graph: &TemporalGraph) -> NodePositions {
        let weighted = graph.to_weighted();
        let n = weighted.node_count();

        let mut points: Vec<[f32; 2]> = match n {
            0 => return NodePositions::new(),
            1 => vec![[0.0, 0.0]],
            2 => vec![[-1.0, 0.0], [1.0, 0.0]],
            _ => {
                let mut laplacian = DMatrix::<f64>::zeros(n, n);
                for (a, b, weight) in weighted.edges() {
                    if a == b {
                        continue;
                    }
                    let w = weight as f64;
                    laplacian[(a, b)] -= w;
                    laplacian[(b, a)] -= w;
                    laplacian[(a, a)] += w;
                    laplacian[(b, b)] += w;
                }

                let eigen = SymmetricEigen::new(laplacian);
                let mut order: Vec<usize> = (0..n).collect();
                order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));

                let (fx, fy) = (order[1], order[2]);
                (0..n)
                    .map(|row| {
                        [
                            eigen.eigenvectors[(row, fx)] as f32,
                            eigen.eigenvectors[(row, fy)] as f32,
                        ]
                    })
                    .collect()
            }
        };

        if n > 2 {
            rescale(&mut points, 1.0);
        }

        points
            .into_iter()
            .enumerate()
            .map(|(index, [x, y])| (weighted.node_id(index), (x, y)))
            .collect()
    }
}
