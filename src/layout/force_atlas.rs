//! ForceAtlas2 with Barnes-Hut repulsion.
//!
//! Bodies carry a mass of `1 + degree`. Each iteration:
//!
//! 1. **Repulsion**: a quadtree of mass regions is rebuilt, and every body is
//!    pushed away from regions far enough to be treated as a point mass
//!    (`distance * theta > size`), recursing into subregions otherwise.
//! 2. **Gravity**: strong gravity pulls every body toward the origin linearly
//!    with its distance.
//! 3. **Attraction**: edges pull their endpoints together with a force
//!    proportional to `weight^influence`, divided by the source mass
//!    (outbound attraction distribution).
//! 4. **Speed**: a global speed adapts to the ratio of swinging (oscillation)
//!    to traction (coherent motion), and each body moves along its force
//!    damped by its own swinging.
//!
//! # References
//!
//! - Jacomy et al., "ForceAtlas2, a Continuous Graph Layout Algorithm for
//!   Handy Network Visualization" (2014)

use rand::Rng;

use super::NodePositions;
use super::random::unit_square_points;
use crate::graph::{TemporalGraph, WeightedGraph};

/// ForceAtlas2 parameters.
///
/// The defaults are the values the `forceatlas2` registry entry runs with.
#[derive(Debug, Clone)]
pub struct ForceAtlas2Params {
    /// Divide attraction by the source mass (default: true).
    pub outbound_attraction_distribution: bool,
    /// Exponent applied to edge weights (default: 2.0).
    pub edge_weight_influence: f32,
    /// How much swinging is tolerated before slowing down (default: 1.0).
    pub jitter_tolerance: f32,
    /// Barnes-Hut opening criterion (default: 1.4).
    pub barnes_hut_theta: f32,
    /// Repulsion strength (default: 1.0).
    pub scaling_ratio: f32,
    /// Gravity grows with distance from the origin (default: true).
    pub strong_gravity: bool,
    /// Gravity strength (default: 0.5).
    pub gravity: f32,
    /// Iteration count (default: 200).
    pub iterations: u32,
}

impl Default for ForceAtlas2Params {
    fn default() -> Self {
        Self {
            outbound_attraction_distribution: true,
            edge_weight_influence: 2.0,
            jitter_tolerance: 1.0,
            barnes_hut_theta: 1.4,
            scaling_ratio: 1.0,
            strong_gravity: true,
            gravity: 0.5,
            iterations: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Body {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    old_dx: f32,
    old_dy: f32,
    mass: f32,
}

/// Quadtree node over a subset of bodies.
#[derive(Debug)]
struct Region {
    mass: f32,
    center_x: f32,
    center_y: f32,
    size: f32,
    /// Body indices; a single entry makes this a leaf.
    bodies: Vec<usize>,
    children: Vec<usize>,
}

impl Region {
    fn new(bodies: Vec<usize>, state: &[Body]) -> Self {
        let mass: f32 = bodies.iter().map(|&i| state[i].mass).sum();
        let (mut sx, mut sy) = (0.0f32, 0.0f32);
        for &i in &bodies {
            sx += state[i].x * state[i].mass;
            sy += state[i].y * state[i].mass;
        }
        let (center_x, center_y) = if mass > 0.0 {
            (sx / mass, sy / mass)
        } else {
            (0.0, 0.0)
        };
        let size = bodies
            .iter()
            .map(|&i| {
                let (dx, dy) = (state[i].x - center_x, state[i].y - center_y);
                2.0 * (dx * dx + dy * dy).sqrt()
            })
            .fold(0.0f32, f32::max);

        Self {
            mass,
            center_x,
            center_y,
            size,
            bodies,
            children: Vec::new(),
        }
    }
}

/// Region arena; index 0 is the root.
struct RegionTree {
    regions: Vec<Region>,
}

impl RegionTree {
    fn build(state: &[Body]) -> Self {
        let mut regions = vec![Region::new((0..state.len()).collect(), state)];
        let mut pending = vec![0usize];

        while let Some(parent) = pending.pop() {
            if regions[parent].bodies.len() < 2 {
                continue;
            }

            let (cx, cy) = (regions[parent].center_x, regions[parent].center_y);
            let mut quadrants: [Vec<usize>; 4] = Default::default();
            for &i in &regions[parent].bodies {
                let right = state[i].x >= cx;
                let bottom = state[i].y >= cy;
                quadrants[usize::from(right) * 2 + usize::from(bottom)].push(i);
            }

            let total = regions[parent].bodies.len();
            for quadrant in quadrants {
                if quadrant.is_empty() {
                    continue;
                }
                // A quadrant holding every body cannot split further.
                let groups: Vec<Vec<usize>> = if quadrant.len() < total {
                    vec![quadrant]
                } else {
                    quadrant.into_iter().map(|i| vec![i]).collect()
                };
                for group in groups {
                    let child = regions.len();
                    regions.push(Region::new(group, state));
                    regions[parent].children.push(child);
                    pending.push(child);
                }
            }
        }

        Self { regions }
    }

    /// Accumulate the repulsion on `body` into `(dx, dy)`.
    fn repulse(&self, body: usize, state: &[Body], theta: f32, coefficient: f32) -> (f32, f32) {
        let me = state[body];
        let (mut fx, mut fy) = (0.0f32, 0.0f32);
        let mut stack = vec![0usize];

        while let Some(index) = stack.pop() {
            let region = &self.regions[index];
            let (other_x, other_y, other_mass) = if region.bodies.len() < 2 {
                let Some(&other) = region.bodies.first() else {
                    continue;
                };
                (state[other].x, state[other].y, state[other].mass)
            } else {
                let (dx, dy) = (me.x - region.center_x, me.y - region.center_y);
                let distance = (dx * dx + dy * dy).sqrt();
                if distance * theta <= region.size {
                    stack.extend(region.children.iter().copied());
                    continue;
                }
                (region.center_x, region.center_y, region.mass)
            };

            let (dx, dy) = (me.x - other_x, me.y - other_y);
            let distance_sq = dx * dx + dy * dy;
            if distance_sq > 0.0 {
                let factor = coefficient * me.mass * other_mass / distance_sq;
                fx += dx * factor;
                fy += dy * factor;
            }
        }

        (fx, fy)
    }
}

/// ForceAtlas2 layout.
#[derive(Debug, Clone, Default)]
pub struct ForceAtlas2Layout {
    pub params: ForceAtlas2Params,
}

impl ForceAtlas2Layout {
    pub fn new(params: ForceAtlas2Params) -> Self {
        Self { params }
    }

    pub fn compute<R: Rng + ?Sized>(&self, graph: &TemporalGraph, rng: &mut R) -> NodePositions {
        let weighted = graph.to_weighted();
        self.layout_weighted(&weighted, rng)
            .into_iter()
            .enumerate()
            .map(|(index, [x, y])| (weighted.node_id(index), (x, y)))
            .collect()
    }

    /// Lay out a simplified graph; points follow dense node order.
    pub fn layout_weighted<R: Rng + ?Sized>(
        &self,
        graph: &WeightedGraph,
        rng: &mut R,
    ) -> Vec<[f32; 2]> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        let params = &self.params;
        let degrees = graph.distinct_degrees();
        let mut bodies: Vec<Body> = unit_square_points(n, rng)
            .into_iter()
            .zip(&degrees)
            .map(|([x, y], &degree)| Body {
                x,
                y,
                mass: 1.0 + degree as f32,
                ..Body::default()
            })
            .collect();

        let edges: Vec<(usize, usize, f32)> = graph
            .edges()
            .filter(|&(a, b, _)| a != b)
            .map(|(a, b, weight)| (a, b, weight.powf(params.edge_weight_influence)))
            .collect();

        let attraction_coefficient = if params.outbound_attraction_distribution {
            bodies.iter().map(|b| b.mass).sum::<f32>() / n as f32
        } else {
            1.0
        };

        let mut speed = 1.0f32;
        let mut speed_efficiency = 1.0f32;

        for _ in 0..params.iterations {
            for body in &mut bodies {
                body.old_dx = body.dx;
                body.old_dy = body.dy;
                body.dx = 0.0;
                body.dy = 0.0;
            }

            let tree = RegionTree::build(&bodies);
            for i in 0..n {
                let (fx, fy) =
                    tree.repulse(i, &bodies, params.barnes_hut_theta, params.scaling_ratio);
                bodies[i].dx += fx;
                bodies[i].dy += fy;
            }

            for body in &mut bodies {
                apply_gravity(body, params);
            }

            for &(a, b, weight) in &edges {
                let (dx, dy) = (bodies[a].x - bodies[b].x, bodies[a].y - bodies[b].y);
                let mut factor = -attraction_coefficient * weight;
                if params.outbound_attraction_distribution {
                    factor /= bodies[a].mass;
                }
                bodies[a].dx += dx * factor;
                bodies[a].dy += dy * factor;
                bodies[b].dx -= dx * factor;
                bodies[b].dy -= dy * factor;
            }

            (speed, speed_efficiency) =
                adjust_speed_and_move(
                    &mut bodies,
                    speed,
                    speed_efficiency,
                    params.jitter_tolerance,
                );
        }

        bodies.into_iter().map(|b| [b.x, b.y]).collect()
    }
}

fn apply_gravity(body: &mut Body, params: &ForceAtlas2Params) {
    let (x, y) = (body.x, body.y);
    if params.strong_gravity {
        if x != 0.0 && y != 0.0 {
            let factor = params.scaling_ratio * body.mass * params.gravity;
            body.dx -= x * factor;
            body.dy -= y * factor;
        }
    } else {
        let distance = (x * x + y * y).sqrt();
        if distance > 0.0 {
            let factor = body.mass * params.gravity / distance;
            body.dx -= x * factor;
            body.dy -= y * factor;
        }
    }
}

/// Returns the updated `(speed, speed_efficiency)`.
fn adjust_speed_and_move(
    bodies: &mut [Body],
    speed: f32,
    speed_efficiency: f32,
    jitter_tolerance: f32,
) -> (f32, f32) {
    let n = bodies.len() as f32;
    let mut total_swinging = 0.0f32;
    let mut total_traction = 0.0f32;
    for b in bodies.iter() {
        let swinging = ((b.old_dx - b.dx).powi(2) + (b.old_dy - b.dy).powi(2)).sqrt();
        total_swinging += b.mass * swinging;
        total_traction +=
            0.5 * b.mass * ((b.old_dx + b.dx).powi(2) + (b.old_dy + b.dy).powi(2)).sqrt();
    }

    let estimated_optimal_jitter = 0.05 * n.sqrt();
    let min_jitter = estimated_optimal_jitter.sqrt();
    let max_jitter = 10.0f32;
    let mut jitter = jitter_tolerance
        * min_jitter.max(max_jitter.min(estimated_optimal_jitter * total_traction / (n * n)));

    let mut efficiency = speed_efficiency;
    let min_speed_efficiency = 0.05f32;
    if total_traction > 0.0 && total_swinging / total_traction > 2.0 {
        if efficiency > min_speed_efficiency {
            efficiency *= 0.5;
        }
        jitter = jitter.max(jitter_tolerance);
    }

    let target_speed = if total_swinging == 0.0 {
        f32::INFINITY
    } else {
        jitter * efficiency * total_traction / total_swinging
    };

    if total_swinging > jitter * total_traction {
        if efficiency > min_speed_efficiency {
            efficiency *= 0.7;
        }
    } else if speed < 1000.0 {
        efficiency *= 1.3;
    }

    let max_rise = 0.5f32;
    let speed = speed + (target_speed - speed).min(max_rise * speed);

    for b in bodies.iter_mut() {
        let swinging = b.mass * ((b.old_dx - b.dx).powi(2) + (b.old_dy - b.dy).powi(2)).sqrt();
        let factor = speed / (1.0 + (speed * swinging).sqrt());
        b.x += b.dx * factor;
        b.y += b.dy * factor;
    }

    (speed, efficiency)
}
