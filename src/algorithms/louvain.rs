//! Multi-level Louvain community detection.
//!
//! Each level runs local moving (every node greedily joins the neighbouring
//! community with the best modularity gain until no move helps), then
//! aggregates each community into a super-node whose self-loop carries the
//! internal weight. Levels repeat until the partition stops shrinking.
//!
//! Every level is mapped back to the original nodes and scored against the
//! original graph; the best-scoring partition with more than one community
//! wins. Unchecked coarsening collapses tree-like graphs into a single
//! community, which is useless as a layout grouping.
//!
//! Blondel et al., "Fast unfolding of communities in large networks" (2008)

use serde::Deserialize;
use std::collections::HashMap;

use super::CommunityDetection;
use crate::graph::{NodeId, WeightedGraph};

/// Louvain tuning knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Resolution parameter (default: 1.0).
    /// Higher values produce more, smaller communities.
    pub resolution: f64,
    /// Maximum local-moving sweeps per level (default: 100).
    pub max_iterations: u32,
    /// Sweep-level convergence threshold for modularity gain (default: 0.0001).
    pub min_modularity_gain: f64,
    /// Maximum number of aggregation levels (default: 20).
    pub max_levels: u32,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 100,
            min_modularity_gain: 0.0001,
            max_levels: 20,
        }
    }
}

/// Result of community detection, indexed by dense node index.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Community per node, contiguous ids starting at 0.
    pub assignments: Vec<u32>,
    /// Number of distinct communities.
    pub community_count: u32,
    /// Modularity of the chosen partition (Q ∈ [-0.5, 1.0]).
    pub modularity: f64,
}

/// Louvain community detector.
#[derive(Debug, Clone, Default)]
pub struct Louvain {
    pub config: LouvainConfig,
}

impl Louvain {
    pub fn new(config: LouvainConfig) -> Self {
        Self { config }
    }

    /// Detect communities on `graph`.
    pub fn detect(&self, graph: &WeightedGraph) -> Partition {
        let node_count = graph.node_count();
        if node_count == 0 {
            return Partition {
                assignments: Vec::new(),
                community_count: 0,
                modularity: 0.0,
            };
        }

        let original = Level::from_graph(graph);
        if original.total_weight < f64::EPSILON {
            // No edges: every node is its own community.
            return Partition {
                assignments: (0..node_count as u32).collect(),
                community_count: node_count as u32,
                modularity: 0.0,
            };
        }

        let mut mappings: Vec<Vec<usize>> = Vec::new();
        let mut current = original.clone();

        let singletons: Vec<u32> = (0..node_count as u32).collect();
        let mut best = Partition {
            modularity: original.modularity(&singletons, node_count as u32, self.config.resolution),
            assignments: singletons,
            community_count: node_count as u32,
        };

        for _ in 0..self.config.max_levels {
            let moved = current.local_moving(&self.config);
            let (compacted, community_count) = compact(&moved);
            if community_count >= current.len() {
                break;
            }
            mappings.push(compacted.clone());

            let candidate = flatten(&mappings, node_count);
            let candidate_count = candidate.iter().copied().max().unwrap_or(0) + 1;
            let modularity =
                original.modularity(&candidate, candidate_count, self.config.resolution);

            if modularity > best.modularity && candidate_count > 1 {
                best = Partition {
                    assignments: candidate,
                    community_count: candidate_count,
                    modularity,
                };
            }
            if modularity < best.modularity - 0.01 {
                break;
            }

            current = current.aggregate(&compacted, community_count);
        }

        best
    }
}

impl CommunityDetection for Louvain {
    fn partition(&self, graph: &WeightedGraph) -> HashMap<NodeId, u32> {
        let partition = self.detect(graph);
        partition
            .assignments
            .iter()
            .enumerate()
            .map(|(index, &community)| (graph.node_id(index), community))
            .collect()
    }
}

/// One aggregation level: weighted neighbour lists plus cached degrees.
#[derive(Debug, Clone)]
struct Level {
    /// `(neighbour, weight)` per incident edge; aggregated self-loops appear here too.
    neighbors: Vec<Vec<(usize, f64)>>,
    /// Weighted degree per node (a self-loop counts twice).
    degree: Vec<f64>,
    /// Total edge weight `m`.
    total_weight: f64,
}

impl Level {
    fn from_graph(graph: &WeightedGraph) -> Self {
        let node_count = graph.node_count();
        let mut neighbors: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        let mut degree = vec![0.0f64; node_count];
        let mut total_weight = 0.0f64;

        for (a, b, weight) in graph.edges() {
            let w = weight as f64;
            if a == b {
                neighbors[a].push((a, 2.0 * w));
                degree[a] += 2.0 * w;
            } else {
                neighbors[a].push((b, w));
                neighbors[b].push((a, w));
                degree[a] += w;
                degree[b] += w;
            }
            total_weight += w;
        }

        Self {
            neighbors,
            degree,
            total_weight,
        }
    }

    fn len(&self) -> usize {
        self.degree.len()
    }

    /// Phase 1: greedy local moving. Returns uncompacted community ids.
    fn local_moving(&self, config: &LouvainConfig) -> Vec<usize> {
        let node_count = self.len();
        if self.total_weight < f64::EPSILON {
            return (0..node_count).collect();
        }

        let m2 = 2.0 * self.total_weight;
        let resolution = config.resolution;

        let mut community: Vec<usize> = (0..node_count).collect();
        let mut sigma_tot: Vec<f64> = self.degree.clone();

        for _ in 0..config.max_iterations {
            let mut moved_any = false;
            let mut sweep_gain = 0.0f64;

            for node in 0..node_count {
                let k_i = self.degree[node];
                if k_i < f64::EPSILON {
                    continue;
                }
                let home = community[node];

                let mut links: HashMap<usize, f64> = HashMap::new();
                for &(neighbor, weight) in &self.neighbors[node] {
                    if neighbor != node {
                        *links.entry(community[neighbor]).or_insert(0.0) += weight;
                    }
                }

                sigma_tot[home] -= k_i;

                let gain = |links_to: f64, target: usize, sigma_tot: &[f64]| {
                    links_to / m2 - resolution * sigma_tot[target] * k_i / (m2 * m2)
                };
                let stay = gain(links.get(&home).copied().unwrap_or(0.0), home, &sigma_tot);

                let mut best = home;
                let mut best_gain = 0.0f64;
                for (&target, &links_to) in &links {
                    let net = gain(links_to, target, &sigma_tot) - stay;
                    // Tie-break on the smaller id so sweeps do not depend on hash order.
                    if net > best_gain || (net == best_gain && net > 0.0 && target < best) {
                        best_gain = net;
                        best = target;
                    }
                }

                community[node] = best;
                sigma_tot[best] += k_i;

                if best != home {
                    moved_any = true;
                    sweep_gain += best_gain;
                }
            }

            if !moved_any || sweep_gain < config.min_modularity_gain {
                break;
            }
        }

        community
    }

    /// Phase 2: collapse each community into one super-node.
    fn aggregate(&self, community: &[usize], community_count: usize) -> Level {
        let mut between: HashMap<(usize, usize), f64> = HashMap::new();
        for (node, edges) in self.neighbors.iter().enumerate() {
            for &(neighbor, weight) in edges {
                *between
                    .entry((community[node], community[neighbor]))
                    .or_insert(0.0) += weight;
            }
        }

        let mut neighbors: Vec<Vec<(usize, f64)>> = vec![Vec::new(); community_count];
        let mut degree = vec![0.0f64; community_count];
        for ((from, to), weight) in between {
            // Both directions of every edge were accumulated, self-loops included.
            neighbors[from].push((to, weight));
            degree[from] += weight;
        }

        Level {
            neighbors,
            degree,
            total_weight: self.total_weight,
        }
    }

    /// Q = (1/2m) Σ_ij [A_ij − γ k_i k_j / 2m] δ(c_i, c_j)
    fn modularity(&self, assignments: &[u32], community_count: u32, resolution: f64) -> f64 {
        if self.total_weight < f64::EPSILON {
            return 0.0;
        }
        let m2 = 2.0 * self.total_weight;

        let mut internal = vec![0.0f64; community_count as usize];
        let mut totals = vec![0.0f64; community_count as usize];
        for (node, edges) in self.neighbors.iter().enumerate() {
            let c = assignments[node];
            totals[c as usize] += self.degree[node];
            for &(neighbor, weight) in edges {
                if assignments[neighbor] == c {
                    internal[c as usize] += weight;
                }
            }
        }

        internal
            .iter()
            .zip(&totals)
            .map(|(&inside, &total)| inside / m2 - resolution * (total / m2).powi(2))
            .sum()
    }
}

/// Relabel community ids to `0..count` in order of first appearance.
fn compact(community: &[usize]) -> (Vec<usize>, usize) {
    let mut ids: HashMap<usize, usize> = HashMap::new();
    let compacted = community
        .iter()
        .map(|&c| {
            let next = ids.len();
            *ids.entry(c).or_insert(next)
        })
        .collect();
    (compacted, ids.len())
}

/// Trace each original node through every aggregation level.
fn flatten(mappings: &[Vec<usize>], node_count: usize) -> Vec<u32> {
    let traced: Vec<usize> = (0..node_count)
        .map(|node| mappings.iter().fold(node, |c, level| level[c]))
        .collect();
    let (compacted, _) = compact(&traced);
    compacted.into_iter().map(|c| c as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TemporalGraph;

    fn detect(edges: &[(u32, u32)], resolution: f64) -> Partition {
        let graph = TemporalGraph::from_edges(edges.iter().copied()).to_weighted();
        Louvain::new(LouvainConfig {
            resolution,
            ..Default::default()
        })
        .detect(&graph)
    }

    #[test]
    fn test_empty_graph() {
        let result = Louvain::default().detect(&WeightedGraph::default());
        assert_eq!(result.community_count, 0);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn test_isolated_nodes_are_singletons() {
        let mut graph = TemporalGraph::new();
        graph.add_node(NodeId(0));
        graph.add_node(NodeId(1));
        let result = Louvain::default().detect(&graph.to_weighted());
        assert_eq!(result.community_count, 2);
        assert_eq!(result.assignments.len(), 2);
    }

    #[test]
    fn test_two_disconnected_cliques() {
        let edges = [(0, 1), (0, 2), (1, 2), (3, 4), (3, 5), (4, 5)];
        let result = detect(&edges, 1.0);

        assert_eq!(
            result.community_count, 2,
            "Expected 2 communities, got {}",
            result.community_count
        );
        assert_eq!(result.assignments[0], result.assignments[1]);
        assert_eq!(result.assignments[1], result.assignments[2]);
        assert_eq!(result.assignments[3], result.assignments[4]);
        assert_eq!(result.assignments[4], result.assignments[5]);
        assert_ne!(result.assignments[0], result.assignments[3]);
        assert!(
            result.modularity > 0.0,
            "Modularity should be positive, got {}",
            result.modularity
        );
    }

    #[test]
    fn test_bridged_cliques_split_at_bridge() {
        let edges = [(0, 1), (0, 2), (1, 2), (3, 4), (3, 5), (4, 5), (2, 3)];
        let result = detect(&edges, 1.0);

        assert_eq!(result.community_count, 2);
        assert_ne!(result.assignments[0], result.assignments[5]);
    }

    #[test]
    fn test_complete_graph_converges() {
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        let result = detect(&edges, 1.0);
        assert_eq!(result.assignments.len(), 4);
        assert!(result.community_count >= 1 && result.community_count <= 4);
    }

    #[test]
    fn test_partition_is_keyed_by_node_id() {
        let graph = TemporalGraph::from_edges([
            (10, 11),
            (11, 12),
            (10, 12),
            (20, 21),
            (21, 22),
            (20, 22),
        ])
        .to_weighted();
        let partition = Louvain::default().partition(&graph);

        assert_eq!(partition.len(), 6);
        assert_eq!(partition[&NodeId(10)], partition[&NodeId(12)]);
        assert_ne!(partition[&NodeId(10)], partition[&NodeId(21)]);
    }

    #[test]
    fn test_large_ring_of_communities() {
        let communities = 5u32;
        let per_community = 200u32;
        let mut edges = Vec::new();
        for c in 0..communities {
            let base = c * per_community;
            for i in 0..per_community {
                for j in 1..=6 {
                    edges.push((base + i, base + (i + j) % per_community));
                }
            }
            edges.push((base, ((c + 1) % communities) * per_community));
        }

        let result = detect(&edges, 1.0);
        assert!(
            result.community_count >= 2,
            "Should detect multiple communities, got {}",
            result.community_count
        );
        assert!(
            result.community_count <= 100,
            "Should not over-segment, got {}",
            result.community_count
        );
        assert!(
            result.modularity > 0.3,
            "Modularity should reflect the ring structure, got {}",
            result.modularity
        );
    }
}
