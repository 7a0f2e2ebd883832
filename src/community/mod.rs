//! Community detection algorithms
//!
//! Five clustering strategies behind one seam: Louvain and Fast-Newman
//! optimize modularity directly, Girvan-Newman splits by removing
//! high-betweenness edges (a fixed number of removals, or until a target
//! component count is reached), and Wu-Huberman bisects along voltage
//! drops between sampled source/sink pairs. Every strategy returns a true
//! partition: communities are pairwise disjoint and cover the node set.
//!
//! All strategies are deterministic for a fixed graph, parameter and seed,
//! and order their communities by first node appearance rather than by any
//! sort, so downstream label assignment is reproducible.

pub mod fast_newman;
pub mod girvan_newman;
pub mod louvain;
pub mod metrics;
pub mod wu_huberman;

use crate::error::Result;
use crate::graph::CommunityGraph;
use std::fmt;
use std::str::FromStr;

pub use fast_newman::FastNewman;
pub use girvan_newman::GirvanNewman;
pub use louvain::Louvain;
pub use wu_huberman::WuHuberman;

/// One block of a partition: node indices, ascending
pub type Community = Vec<u32>;

/// A complete disjoint decomposition of a graph's nodes
pub type Partition = Vec<Community>;

/// Uniform invocation contract for the clustering strategies
///
/// Parameters are supplied at construction time; the call itself only
/// takes the graph.
pub trait CommunityDetector {
    /// Compute a partition of the graph's nodes
    fn communities(&self, graph: &CommunityGraph) -> Result<Partition>;
}

/// The selectable algorithm variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Louvain,
    /// Edge-betweenness splitting with a fixed edge-removal count
    GirvanNewman,
    /// Edge-betweenness splitting until a target community count
    ImprovedGirvanNewman,
    WuHuberman,
    FastNewman,
}

impl AlgorithmKind {
    /// Two-letter family code used to tag comparative run results
    pub fn code(&self) -> &'static str {
        match self {
            AlgorithmKind::Louvain => "LV",
            AlgorithmKind::GirvanNewman | AlgorithmKind::ImprovedGirvanNewman => "GN",
            AlgorithmKind::WuHuberman => "WH",
            AlgorithmKind::FastNewman => "FN",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmKind::Louvain => "louvain",
            AlgorithmKind::GirvanNewman => "girvan-newman",
            AlgorithmKind::ImprovedGirvanNewman => "improved-girvan-newman",
            AlgorithmKind::WuHuberman => "wu-huberman",
            AlgorithmKind::FastNewman => "fast-newman",
        };
        f.write_str(name)
    }
}

impl FromStr for AlgorithmKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "louvain" => Ok(AlgorithmKind::Louvain),
            "girvan-newman" => Ok(AlgorithmKind::GirvanNewman),
            "improved-girvan-newman" => Ok(AlgorithmKind::ImprovedGirvanNewman),
            "wu-huberman" => Ok(AlgorithmKind::WuHuberman),
            "fast-newman" => Ok(AlgorithmKind::FastNewman),
            other => Err(format!("unknown algorithm {other:?}")),
        }
    }
}

/// Group a per-node community assignment into a partition
///
/// Communities appear in order of their first member node; members stay in
/// ascending node order.
pub(crate) fn group_by_assignment(assignment: &[usize]) -> Partition {
    let mut remap: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    let mut communities: Partition = Vec::new();

    for (node, &label) in assignment.iter().enumerate() {
        let idx = *remap.entry(label).or_insert_with(|| {
            communities.push(Vec::new());
            communities.len() - 1
        });
        communities[idx].push(node as u32);
    }

    communities
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Partition;
    use crate::graph::CommunityGraph;
    use std::collections::HashSet;

    /// Assert the partition invariant: disjoint communities covering the
    /// whole node set
    pub fn assert_partition(graph: &CommunityGraph, partition: &Partition) {
        let mut seen = HashSet::new();
        for community in partition {
            assert!(!community.is_empty(), "empty community in partition");
            for &node in community {
                assert!((node as usize) < graph.node_count(), "unknown node {node}");
                assert!(seen.insert(node), "node {node} appears twice");
            }
        }
        assert_eq!(seen.len(), graph.node_count(), "partition does not cover all nodes");
    }

    /// Two disjoint triangles: a-b-c and d-e-f
    pub fn two_triangles() -> CommunityGraph {
        let mut graph = CommunityGraph::new();
        for (u, v) in [("a", "b"), ("b", "c"), ("a", "c"), ("d", "e"), ("e", "f"), ("d", "f")] {
            graph.add_edge(u, v, 1.0);
        }
        graph
    }

    /// Two triangles joined by a single bridge edge c-d
    pub fn bridged_triangles() -> CommunityGraph {
        let mut graph = two_triangles();
        graph.add_edge("c", "d", 1.0);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{assert_partition, bridged_triangles, two_triangles};
    use super::*;

    #[test]
    fn algorithm_codes_collapse_to_four_families() {
        assert_eq!(AlgorithmKind::Louvain.code(), "LV");
        assert_eq!(AlgorithmKind::GirvanNewman.code(), "GN");
        assert_eq!(AlgorithmKind::ImprovedGirvanNewman.code(), "GN");
        assert_eq!(AlgorithmKind::WuHuberman.code(), "WH");
        assert_eq!(AlgorithmKind::FastNewman.code(), "FN");
    }

    #[test]
    fn algorithm_names_round_trip() {
        for kind in [
            AlgorithmKind::Louvain,
            AlgorithmKind::GirvanNewman,
            AlgorithmKind::ImprovedGirvanNewman,
            AlgorithmKind::WuHuberman,
            AlgorithmKind::FastNewman,
        ] {
            assert_eq!(kind.to_string().parse::<AlgorithmKind>(), Ok(kind));
        }
        assert!("edge-magic".parse::<AlgorithmKind>().is_err());
    }

    #[test]
    fn group_by_assignment_orders_by_first_appearance() {
        let partition = group_by_assignment(&[7, 3, 7, 9, 3]);
        assert_eq!(partition, vec![vec![0, 2], vec![1, 4], vec![3]]);
    }

    #[test]
    fn every_strategy_returns_a_true_partition() {
        let graphs = [two_triangles(), bridged_triangles()];
        for graph in &graphs {
            let detectors: Vec<Box<dyn CommunityDetector>> = vec![
                Box::new(Louvain::new()),
                Box::new(FastNewman::new()),
                Box::new(GirvanNewman::remove_edges(2)),
                Box::new(GirvanNewman::with_target(2)),
                Box::new(WuHuberman::new(2)),
            ];
            for detector in detectors {
                let partition = detector.communities(graph).unwrap();
                assert_partition(graph, &partition);
            }
        }
    }
}
