//! Girvan-Newman divisive clustering
//!
//! Removes the edge with the highest betweenness centrality, recomputing
//! scores after every removal, and reads communities off the remaining
//! connected components. Two stopping rules cover the classic variant
//! (a fixed number of removals) and the improved variant (split until a
//! target component count is reached).

use super::{CommunityDetector, Partition};
use crate::error::{Error, Result};
use crate::graph::algorithms::{connected_components, edge_betweenness};
use crate::graph::CommunityGraph;

#[derive(Debug, Clone, Copy)]
enum StopRule {
    RemoveEdges(usize),
    TargetCommunities(usize),
}

/// Edge-betweenness splitter
#[derive(Debug, Clone)]
pub struct GirvanNewman {
    stop: StopRule,
}

impl GirvanNewman {
    /// Classic variant: delete a fixed number of edges
    pub fn remove_edges(count: usize) -> Self {
        Self {
            stop: StopRule::RemoveEdges(count),
        }
    }

    /// Improved variant: delete edges until the component count reaches
    /// `communities`
    pub fn with_target(communities: usize) -> Self {
        Self {
            stop: StopRule::TargetCommunities(communities),
        }
    }
}

/// Delete the highest-betweenness edge, lowest endpoint pair on ties
///
/// Returns false when no edges remain.
fn remove_most_central_edge(adj: &mut [Vec<usize>]) -> bool {
    let scores = edge_betweenness(adj);

    let mut best: Option<((usize, usize), f64)> = None;
    for (&edge, &score) in &scores {
        let better = match best {
            None => true,
            Some((best_edge, best_score)) => {
                score > best_score + 1e-9
                    || ((score - best_score).abs() <= 1e-9 && edge < best_edge)
            }
        };
        if better {
            best = Some((edge, score));
        }
    }

    let Some(((u, v), _)) = best else {
        return false;
    };
    adj[u].retain(|&x| x != v);
    adj[v].retain(|&x| x != u);
    true
}

impl CommunityDetector for GirvanNewman {
    fn communities(&self, graph: &CommunityGraph) -> Result<Partition> {
        let n = graph.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut adj = graph.adjacency();
        match self.stop {
            StopRule::RemoveEdges(count) => {
                let edge_count = graph.edge_count();
                if count > edge_count {
                    return Err(Error::InvalidRemovalCount {
                        requested: count,
                        edge_count,
                    });
                }
                for _ in 0..count {
                    remove_most_central_edge(&mut adj);
                }
            }
            StopRule::TargetCommunities(target) => {
                if target == 0 || target > n {
                    return Err(Error::InvalidClusterCount {
                        requested: target,
                        node_count: n,
                    });
                }
                while connected_components(&adj).len() < target {
                    if !remove_most_central_edge(&mut adj) {
                        break;
                    }
                }
            }
        }

        let partition = connected_components(&adj)
            .into_iter()
            .map(|component| component.into_iter().map(|node| node as u32).collect())
            .collect();
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{assert_partition, bridged_triangles, two_triangles};
    use super::*;

    #[test]
    fn removing_the_bridge_splits_the_triangles() {
        // The bridge carries every cross-triangle shortest path, so it is
        // the first edge to go
        let graph = bridged_triangles();
        let partition = GirvanNewman::remove_edges(1).communities(&graph).unwrap();
        assert_partition(&graph, &partition);
        assert_eq!(partition, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn zero_removals_return_existing_components() {
        let graph = two_triangles();
        let partition = GirvanNewman::remove_edges(0).communities(&graph).unwrap();
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn removal_count_above_edge_count_is_rejected() {
        let graph = two_triangles();
        let result = GirvanNewman::remove_edges(7).communities(&graph);
        assert!(matches!(
            result,
            Err(Error::InvalidRemovalCount {
                requested: 7,
                edge_count: 6
            })
        ));
    }

    #[test]
    fn target_mode_reaches_requested_count() {
        let graph = bridged_triangles();
        let partition = GirvanNewman::with_target(2).communities(&graph).unwrap();
        assert_partition(&graph, &partition);
        assert_eq!(partition.len(), 2);
        assert_eq!(partition, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn target_already_met_leaves_components_alone() {
        let graph = two_triangles();
        let partition = GirvanNewman::with_target(2).communities(&graph).unwrap();
        assert_eq!(partition, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn target_of_node_count_isolates_every_node() {
        let graph = two_triangles();
        let partition = GirvanNewman::with_target(6).communities(&graph).unwrap();
        assert_eq!(partition.len(), 6);
        assert!(partition.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn out_of_domain_targets_are_rejected() {
        let graph = two_triangles();
        assert!(GirvanNewman::with_target(0).communities(&graph).is_err());
        assert!(GirvanNewman::with_target(7).communities(&graph).is_err());
    }
}
