//! Louvain community detection
//!
//! Two-phase modularity optimization: greedy local moves followed by graph
//! aggregation, repeated until no node changes community. Nodes are visited
//! in index order and ties break toward the lowest community, so the result
//! is deterministic for a given graph.

use super::{group_by_assignment, CommunityDetector, Partition};
use crate::error::Result;
use crate::graph::CommunityGraph;
use std::collections::HashMap;

/// Louvain modularity optimizer
#[derive(Debug, Clone)]
pub struct Louvain {
    max_sweeps: usize,
}

impl Louvain {
    pub fn new() -> Self {
        Self { max_sweeps: 100 }
    }

    /// Cap the number of local-move sweeps per aggregation level
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Phase 1: move nodes between communities while modularity improves
    ///
    /// Returns the per-node assignment and whether any node moved.
    fn local_moves(
        &self,
        n: usize,
        adj: &[Vec<(usize, f64)>],
        self_weights: &[f64],
    ) -> (Vec<usize>, bool) {
        let edge_weight: f64 = adj
            .iter()
            .flat_map(|neighbors| neighbors.iter().map(|&(_, w)| w))
            .sum::<f64>()
            / 2.0;
        let m = edge_weight + self_weights.iter().sum::<f64>();
        if m == 0.0 {
            return ((0..n).collect(), false);
        }

        let mut degrees = vec![0.0; n];
        for (u, neighbors) in adj.iter().enumerate() {
            degrees[u] = neighbors.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self_weights[u];
        }

        let mut assignment: Vec<usize> = (0..n).collect();
        let mut community_degrees = degrees.clone();
        let mut any_moved = false;

        for _ in 0..self.max_sweeps {
            let mut moved = false;

            for node in 0..n {
                let current = assignment[node];
                let ki = degrees[node];

                // Detach the node before weighing candidate communities
                community_degrees[current] -= ki;

                let mut weights_to: HashMap<usize, f64> = HashMap::new();
                for &(neighbor, w) in &adj[node] {
                    *weights_to.entry(assignment[neighbor]).or_insert(0.0) += w;
                }

                // Lowest community id wins ties, staying alone scores zero
                let mut candidates: Vec<(usize, f64)> = weights_to.into_iter().collect();
                candidates.sort_unstable_by_key(|&(community, _)| community);

                let mut best = current;
                let mut best_gain = 0.0;
                for (community, ki_in) in candidates {
                    let gain =
                        ki_in / m - community_degrees[community] * ki / (2.0 * m * m);
                    if gain > best_gain + 1e-12 {
                        best_gain = gain;
                        best = community;
                    }
                }

                if best != current {
                    assignment[node] = best;
                    moved = true;
                    any_moved = true;
                }
                community_degrees[assignment[node]] += ki;
            }

            if !moved {
                break;
            }
        }

        (assignment, any_moved)
    }

    /// Phase 2: contract each community into a single meta-node
    ///
    /// Returns the meta adjacency, meta self-loop weights, and the original
    /// nodes grouped per meta-node.
    #[allow(clippy::type_complexity)]
    fn aggregate(
        n: usize,
        adj: &[Vec<(usize, f64)>],
        self_weights: &[f64],
        assignment: &[usize],
    ) -> (Vec<Vec<(usize, f64)>>, Vec<f64>, Vec<Vec<usize>>) {
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for node in 0..n {
            let idx = *remap.entry(assignment[node]).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[idx].push(node);
        }

        let meta_n = groups.len();
        let mut meta_self = vec![0.0; meta_n];
        for (node, &sw) in self_weights.iter().enumerate() {
            meta_self[remap[&assignment[node]]] += sw;
        }

        let mut between: HashMap<(usize, usize), f64> = HashMap::new();
        for (u, neighbors) in adj.iter().enumerate() {
            for &(v, w) in neighbors {
                if u >= v {
                    continue;
                }
                let (cu, cv) = (remap[&assignment[u]], remap[&assignment[v]]);
                if cu == cv {
                    meta_self[cu] += w;
                } else {
                    let key = if cu < cv { (cu, cv) } else { (cv, cu) };
                    *between.entry(key).or_insert(0.0) += w;
                }
            }
        }

        let mut meta_adj = vec![Vec::new(); meta_n];
        let mut pairs: Vec<((usize, usize), f64)> = between.into_iter().collect();
        pairs.sort_unstable_by_key(|&(pair, _)| pair);
        for ((cu, cv), w) in pairs {
            meta_adj[cu].push((cv, w));
            meta_adj[cv].push((cu, w));
        }

        (meta_adj, meta_self, groups)
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetector for Louvain {
    fn communities(&self, graph: &CommunityGraph) -> Result<Partition> {
        let n = graph.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut level_n = n;
        let mut adj = graph.weighted_adjacency();
        let mut self_weights = vec![0.0; n];
        let mut mapping_stack: Vec<Vec<Vec<usize>>> = Vec::new();

        loop {
            let (assignment, moved) = self.local_moves(level_n, &adj, &self_weights);
            if !moved {
                break;
            }

            let (meta_adj, meta_self, groups) =
                Self::aggregate(level_n, &adj, &self_weights, &assignment);
            if groups.len() == level_n {
                break;
            }

            level_n = groups.len();
            adj = meta_adj;
            self_weights = meta_self;
            mapping_stack.push(groups);
        }

        // Expand the coarsest assignment back to original nodes
        let mut assignment: Vec<usize> = (0..level_n).collect();
        while let Some(groups) = mapping_stack.pop() {
            let original_n: usize = groups.iter().map(Vec::len).sum();
            let mut expanded = vec![0; original_n];
            for (meta_node, members) in groups.iter().enumerate() {
                for &original in members {
                    expanded[original] = assignment[meta_node];
                }
            }
            assignment = expanded;
        }

        Ok(group_by_assignment(&assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{assert_partition, bridged_triangles, two_triangles};
    use super::*;

    #[test]
    fn triangle_is_one_community() {
        let mut graph = CommunityGraph::new();
        for (u, v) in [("a", "b"), ("b", "c"), ("a", "c")] {
            graph.add_edge(u, v, 1.0);
        }

        let partition = Louvain::new().communities(&graph).unwrap();
        assert_eq!(partition.len(), 1);
        assert_eq!(partition[0], vec![0, 1, 2]);
    }

    #[test]
    fn bridged_triangles_split_in_two() {
        let graph = bridged_triangles();
        let partition = Louvain::new().communities(&graph).unwrap();
        assert_partition(&graph, &partition);
        assert_eq!(partition.len(), 2);
        assert_eq!(partition[0], vec![0, 1, 2]);
        assert_eq!(partition[1], vec![3, 4, 5]);
    }

    #[test]
    fn disjoint_triangles_split_in_two() {
        let graph = two_triangles();
        let partition = Louvain::new().communities(&graph).unwrap();
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn empty_graph_yields_empty_partition() {
        let graph = CommunityGraph::new();
        assert!(Louvain::new().communities(&graph).unwrap().is_empty());
    }

    #[test]
    fn edgeless_nodes_stay_singletons() {
        let mut graph = CommunityGraph::new();
        graph.add_node("a");
        graph.add_node("b");

        let partition = Louvain::new().communities(&graph).unwrap();
        assert_eq!(partition, vec![vec![0], vec![1]]);
    }

    #[test]
    fn repeated_runs_agree() {
        let graph = bridged_triangles();
        let first = Louvain::new().communities(&graph).unwrap();
        let second = Louvain::new().communities(&graph).unwrap();
        assert_eq!(first, second);
    }
}
