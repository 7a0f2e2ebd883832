//! Undirected graph model with mutable per-node community labels

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Attributes carried by each node
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Original string identifier
    pub id: String,

    /// Community label, unset until a labeling run assigns one
    pub group: Option<String>,
}

/// Undirected weighted graph with string-identified nodes
///
/// Node indices are `u32`, contiguous and stable: the graph is append-only.
/// Parallel edges are merged by summing weights; self-loops are rejected.
pub struct CommunityGraph {
    graph: UnGraph<NodeData, f64>,
    id_to_index: HashMap<String, u32>,
}

impl Default for CommunityGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            id_to_index: HashMap::new(),
        }
    }

    /// Get or create the node with the given string ID
    pub fn add_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self
            .graph
            .add_node(NodeData {
                id: id.to_string(),
                group: None,
            })
            .index() as u32;
        self.id_to_index.insert(id.to_string(), idx);

        idx
    }

    /// Add an undirected edge between two node IDs, creating nodes as needed
    ///
    /// A repeated pair accumulates weight on the existing edge. Returns false
    /// when the edge is a self-loop and was skipped.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: f64) -> bool {
        let a = self.add_node(source);
        let b = self.add_node(target);
        if a == b {
            return false;
        }

        let (a, b) = (NodeIndex::new(a as usize), NodeIndex::new(b as usize));
        if let Some(edge) = self.graph.find_edge(a, b) {
            self.graph[edge] += weight;
        } else {
            self.graph.add_edge(a, b, weight);
        }

        true
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sum of all edge weights
    pub fn total_edge_weight(&self) -> f64 {
        self.edge_list().map(|(_, _, w)| w).sum()
    }

    /// Look up a node index by its string ID
    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.id_to_index.get(id).copied()
    }

    /// Node attributes for the given index
    pub fn node(&self, index: u32) -> &NodeData {
        &self.graph[NodeIndex::new(index as usize)]
    }

    /// Current group label of a node
    pub fn group(&self, index: u32) -> Option<&str> {
        self.graph[NodeIndex::new(index as usize)].group.as_deref()
    }

    /// Overwrite the group label of a node
    pub fn set_group(&mut self, index: u32, group: String) {
        self.graph[NodeIndex::new(index as usize)].group = Some(group);
    }

    /// Reset every node to the unlabeled state
    pub fn clear_groups(&mut self) {
        for index in self.graph.node_indices() {
            self.graph[index].group = None;
        }
    }

    /// Weighted degree of a node (sum of incident edge weights)
    pub fn weighted_degree(&self, index: u32) -> f64 {
        let node = NodeIndex::new(index as usize);
        self.graph.edges(node).map(|e| *e.weight()).sum()
    }

    /// All edges as (source index, target index, weight), in insertion order
    pub fn edge_list(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    /// Neighbor lists indexed by node
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.node_count()];
        for (u, v, _) in self.edge_list() {
            adj[u].push(v);
            adj[v].push(u);
        }
        adj
    }

    /// Neighbor lists with edge weights, indexed by node
    pub fn weighted_adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.node_count()];
        for (u, v, w) in self.edge_list() {
            adj[u].push((v, w));
            adj[v].push((u, w));
        }
        adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_deduplicated() {
        let mut graph = CommunityGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        assert_ne!(a, b);
        assert_eq!(graph.add_node("a"), a);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn duplicate_edges_merge_weights() {
        let mut graph = CommunityGraph::new();
        assert!(graph.add_edge("a", "b", 1.0));
        assert!(graph.add_edge("b", "a", 2.5));
        assert_eq!(graph.edge_count(), 1);
        assert!((graph.total_edge_weight() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn self_loops_are_rejected() {
        let mut graph = CommunityGraph::new();
        assert!(!graph.add_edge("a", "a", 1.0));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn group_labels_start_unset() {
        let mut graph = CommunityGraph::new();
        graph.add_edge("a", "b", 1.0);
        assert_eq!(graph.group(0), None);

        graph.set_group(0, "0".to_string());
        assert_eq!(graph.group(0), Some("0"));
        assert_eq!(graph.group(1), None);

        graph.clear_groups();
        assert_eq!(graph.group(0), None);
    }

    #[test]
    fn weighted_degree_sums_incident_edges() {
        let mut graph = CommunityGraph::new();
        graph.add_edge("a", "b", 1.0);
        graph.add_edge("a", "c", 2.0);
        let a = graph.index_of("a").unwrap();
        assert!((graph.weighted_degree(a) - 3.0).abs() < 1e-12);
    }
}
