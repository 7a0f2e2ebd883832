//! Partition quality metrics

use super::Community;
use crate::graph::CommunityGraph;

/// Newman modularity of a partition
///
/// Sums, per community, the fraction of edge weight falling inside it minus
/// the squared fraction of degree attached to it:
/// `Q = sum_c [ w_in(c)/m - (deg(c)/2m)^2 ]`. An edgeless graph scores 0
/// by definition. With unit weights this is the plain edge-count form.
pub fn modularity(graph: &CommunityGraph, partition: &[Community]) -> f64 {
    let m = graph.total_edge_weight();
    if m == 0.0 {
        return 0.0;
    }

    let mut membership = vec![usize::MAX; graph.node_count()];
    for (community, members) in partition.iter().enumerate() {
        for &node in members {
            membership[node as usize] = community;
        }
    }

    let mut internal = vec![0.0; partition.len()];
    for (u, v, w) in graph.edge_list() {
        if membership[u] != usize::MAX && membership[u] == membership[v] {
            internal[membership[u]] += w;
        }
    }

    let two_m = 2.0 * m;
    partition
        .iter()
        .enumerate()
        .map(|(community, members)| {
            let degree_sum: f64 = members
                .iter()
                .map(|&node| graph.weighted_degree(node))
                .sum();
            internal[community] / m - (degree_sum / two_m).powi(2)
        })
        .sum()
}

/// Density of a community: internal edges over possible member pairs
///
/// Singleton communities have density 1 by convention.
pub fn community_density(graph: &CommunityGraph, members: &[u32]) -> f64 {
    let k = members.len();
    if k <= 1 {
        return 1.0;
    }

    let mut in_community = vec![false; graph.node_count()];
    for &node in members {
        in_community[node as usize] = true;
    }

    let actual = graph
        .edge_list()
        .filter(|&(u, v, _)| in_community[u] && in_community[v])
        .count();
    let possible = k * (k - 1) / 2;

    actual as f64 / possible as f64
}
