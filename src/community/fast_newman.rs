//! Fast-Newman greedy modularity agglomeration
//!
//! Starts with every node in its own community and repeatedly merges the
//! connected pair with the largest modularity gain, stopping when no merge
//! improves the score. Ties break toward the smallest community pair.

use super::{group_by_assignment, CommunityDetector, Partition};
use crate::error::Result;
use crate::graph::CommunityGraph;
use std::collections::HashMap;

const GAIN_EPSILON: f64 = 1e-12;

/// Greedy modularity merger
#[derive(Debug, Clone, Default)]
pub struct FastNewman;

impl FastNewman {
    pub fn new() -> Self {
        Self
    }
}

impl CommunityDetector for FastNewman {
    fn communities(&self, graph: &CommunityGraph) -> Result<Partition> {
        let n = graph.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut assignment: Vec<usize> = (0..n).collect();
        let m = graph.total_edge_weight();
        if m == 0.0 {
            return Ok(group_by_assignment(&assignment));
        }

        // between[(i, j)] holds e_ij, the fraction of edge weight joining
        // communities i and j; a[i] is the community's degree fraction.
        // Merging i and j changes modularity by 2 * (e_ij - a_i * a_j).
        let two_m = 2.0 * m;
        let mut between: HashMap<(usize, usize), f64> = HashMap::new();
        for (u, v, w) in graph.edge_list() {
            let key = if u < v { (u, v) } else { (v, u) };
            *between.entry(key).or_insert(0.0) += w / two_m;
        }
        let mut degree_fraction: Vec<f64> = (0..n)
            .map(|node| graph.weighted_degree(node as u32) / two_m)
            .collect();

        loop {
            let mut best: Option<((usize, usize), f64)> = None;
            for (&pair, &e) in &between {
                let gain = 2.0 * (e - degree_fraction[pair.0] * degree_fraction[pair.1]);
                let better = match best {
                    None => true,
                    Some((best_pair, best_gain)) => {
                        gain > best_gain + GAIN_EPSILON
                            || ((gain - best_gain).abs() <= GAIN_EPSILON && pair < best_pair)
                    }
                };
                if better {
                    best = Some((pair, gain));
                }
            }

            let Some(((keep, absorb), gain)) = best else {
                break;
            };
            if gain <= GAIN_EPSILON {
                break;
            }

            // Fold community `absorb` into `keep`
            let absorbed: Vec<((usize, usize), f64)> = between
                .iter()
                .filter(|(&(x, y), _)| x == absorb || y == absorb)
                .map(|(&pair, &e)| (pair, e))
                .collect();
            for (pair, e) in absorbed {
                between.remove(&pair);
                let other = if pair.0 == absorb { pair.1 } else { pair.0 };
                if other == keep {
                    continue;
                }
                let key = if keep < other { (keep, other) } else { (other, keep) };
                *between.entry(key).or_insert(0.0) += e;
            }
            degree_fraction[keep] += degree_fraction[absorb];

            for label in assignment.iter_mut() {
                if *label == absorb {
                    *label = keep;
                }
            }
        }

        Ok(group_by_assignment(&assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{assert_partition, bridged_triangles, two_triangles};
    use super::*;

    #[test]
    fn disjoint_triangles_never_merge_across() {
        let graph = two_triangles();
        let partition = FastNewman::new().communities(&graph).unwrap();
        assert_partition(&graph, &partition);
        assert_eq!(partition.len(), 2);
        assert_eq!(partition[0], vec![0, 1, 2]);
        assert_eq!(partition[1], vec![3, 4, 5]);
    }

    #[test]
    fn bridged_triangles_split_in_two() {
        let graph = bridged_triangles();
        let partition = FastNewman::new().communities(&graph).unwrap();
        assert_partition(&graph, &partition);
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn edgeless_graph_keeps_singletons() {
        let mut graph = CommunityGraph::new();
        graph.add_node("a");
        graph.add_node("b");
        graph.add_node("c");

        let partition = FastNewman::new().communities(&graph).unwrap();
        assert_eq!(partition, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn empty_graph_yields_empty_partition() {
        let graph = CommunityGraph::new();
        assert!(FastNewman::new().communities(&graph).unwrap().is_empty());
    }

    #[test]
    fn repeated_runs_agree() {
        let graph = bridged_triangles();
        let first = FastNewman::new().communities(&graph).unwrap();
        let second = FastNewman::new().communities(&graph).unwrap();
        assert_eq!(first, second);
    }
}
