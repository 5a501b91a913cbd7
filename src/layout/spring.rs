//! Weighted spring layout (Fruchterman-Reingold).
//!
//! Parallel edges are collapsed first: the force model assumes a simple
//! graph, and each parallel copy would otherwise add its own attraction.
//!
//! Each iteration every pair of nodes repels with `k² / d` and every edge
//! attracts with `w · d² / k`. Each node moves along its net force by at
//! most the current temperature, which cools linearly from 10% of the
//! initial span down to zero.

use rand::Rng;
use serde::Deserialize;

use super::random::unit_square_points;
use super::{NodePositions, rescale};
use crate::graph::{TemporalGraph, WeightedGraph};

/// Spring layout parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Optimal edge length; `None` uses `sqrt(|V|)`.
    pub k: Option<f32>,
    /// Iteration budget (default: 50).
    pub iterations: u32,
    /// Stop early once mean displacement per node falls below this (default: 1e-4).
    pub threshold: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            k: None,
            iterations: 50,
            threshold: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpringLayout {
    pub config: SpringConfig,
}

impl SpringLayout {
    pub fn new(config: SpringConfig) -> Self {
        Self { config }
    }

    pub fn compute<R: Rng + ?Sized>(&self, graph: &TemporalGraph, rng: &mut R) -> NodePositions {
        let weighted = graph.to_weighted();
        self.layout_weighted(&weighted, rng)
            .into_iter()
            .enumerate()
            .map(|(index, [x, y])| (weighted.node_id(index), (x, y)))
            .collect()
    }

    /// Lay out an already simplified graph; points follow dense node order.
    ///
    /// Output is centred on the origin with largest coordinate magnitude 1.
    pub fn layout_weighted<R: Rng + ?Sized>(
        &self,
        graph: &WeightedGraph,
        rng: &mut R,
    ) -> Vec<[f32; 2]> {
        let n = graph.node_count();
        match n {
            0 => return Vec::new(),
            1 => return vec![[0.0, 0.0]],
            _ => {}
        }

        let k = self.config.k.unwrap_or((n as f32).sqrt());
        let adjacency = graph.adjacency();
        let mut points = unit_square_points(n, rng);

        let span = |points: &[[f32; 2]], axis: usize| {
            let (lo, hi) = points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            hi - lo
        };
        let mut temperature = span(&points, 0).max(span(&points, 1)) * 0.1;
        let cooling = temperature / (self.config.iterations as f32 + 1.0);

        let mut displacement = vec![[0.0f32; 2]; n];
        for _ in 0..self.config.iterations {
            for (i, force) in displacement.iter_mut().enumerate() {
                let [xi, yi] = points[i];
                let mut fx = 0.0f32;
                let mut fy = 0.0f32;

                for (j, &[xj, yj]) in points.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let (dx, dy) = (xi - xj, yi - yj);
                    let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                    let repulsion = k * k / (distance * distance);
                    fx += dx * repulsion;
                    fy += dy * repulsion;
                }

                for &(j, weight) in &adjacency[i] {
                    if i == j {
                        continue;
                    }
                    let [xj, yj] = points[j];
                    let (dx, dy) = (xi - xj, yi - yj);
                    let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                    let attraction = weight * distance / k;
                    fx -= dx * attraction;
                    fy -= dy * attraction;
                }

                *force = [fx, fy];
            }

            let mut moved_sq = 0.0f32;
            for (point, &[fx, fy]) in points.iter_mut().zip(&displacement) {
                let mut length = (fx * fx + fy * fy).sqrt();
                if length < 0.01 {
                    length = 0.1;
                }
                let step = temperature / length;
                point[0] += fx * step;
                point[1] += fy * step;
                moved_sq += (fx * step).powi(2) + (fy * step).powi(2);
            }

            temperature -= cooling;
            if moved_sq.sqrt() / (n as f32) < self.config.threshold {
                break;
            }
        }

        rescale(&mut points, 1.0);
        points
    }
}
