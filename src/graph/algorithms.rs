//! Graph algorithms shared by the clustering strategies

use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    parent: Vec<u32>,
    rank: Vec<u32>,
}

impl DisjointSets {
    /// Create a structure with every element in its own set
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x, with path halving
    pub fn find(&mut self, x: u32) -> u32 {
        let mut x = x;
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Union the sets containing x and y; returns false when already joined
    pub fn union(&mut self, x: u32, y: u32) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        if self.rank[root_x as usize] >= self.rank[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
        true
    }
}

/// Connected components over the whole adjacency structure
///
/// Components are ordered by their smallest node, members ascending.
pub fn connected_components(adj: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let members: Vec<usize> = (0..adj.len()).collect();
    connected_components_of(adj, &members)
}

/// Connected components restricted to a node subset
///
/// Edges leaving the subset are ignored. Component order follows the first
/// occurrence of each component in `members`, with the members' order kept.
pub fn connected_components_of(adj: &[Vec<usize>], members: &[usize]) -> Vec<Vec<usize>> {
    let mut in_subset = vec![false; adj.len()];
    for &u in members {
        in_subset[u] = true;
    }

    let mut sets = DisjointSets::new(adj.len());
    for &u in members {
        for &v in &adj[u] {
            if in_subset[v] && u < v {
                sets.union(u as u32, v as u32);
            }
        }
    }

    let mut root_to_component: HashMap<u32, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for &u in members {
        let root = sets.find(u as u32);
        let idx = *root_to_component.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[idx].push(u);
    }

    components
}

/// Edge betweenness centrality (Brandes accumulation)
///
/// Keys are normalized (low, high) endpoint pairs. Source fan-out runs on
/// the rayon pool; each undirected edge score is halved at the end because
/// every shortest path is counted from both endpoints' sources.
pub fn edge_betweenness(adj: &[Vec<usize>]) -> HashMap<(usize, usize), f64> {
    let partials: Vec<HashMap<(usize, usize), f64>> = (0..adj.len())
        .into_par_iter()
        .map(|source| brandes_from_source(adj, source))
        .collect();

    let mut scores: HashMap<(usize, usize), f64> = HashMap::new();
    for partial in partials {
        for (edge, contribution) in partial {
            *scores.entry(edge).or_insert(0.0) += contribution;
        }
    }
    for score in scores.values_mut() {
        *score /= 2.0;
    }

    scores
}

/// Shortest-path edge contributions from a single source
fn brandes_from_source(adj: &[Vec<usize>], source: usize) -> HashMap<(usize, usize), f64> {
    let n = adj.len();
    let mut stack = Vec::new();
    let mut paths = vec![0u64; n];
    let mut distance = vec![usize::MAX; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dependency = vec![0.0; n];

    paths[source] = 1;
    distance[source] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);

    // BFS to count shortest paths
    while let Some(v) = queue.pop_front() {
        stack.push(v);
        for &w in &adj[v] {
            if distance[w] == usize::MAX {
                distance[w] = distance[v] + 1;
                queue.push_back(w);
            }
            if distance[w] == distance[v] + 1 {
                paths[w] = paths[w].saturating_add(paths[v]);
                predecessors[w].push(v);
            }
        }
    }

    // Backward accumulation onto edges
    let mut scores: HashMap<(usize, usize), f64> = HashMap::new();
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            let contribution = (paths[v] as f64 / paths[w] as f64) * (1.0 + dependency[w]);
            let key = if v < w { (v, w) } else { (w, v) };
            *scores.entry(key).or_insert(0.0) += contribution;
            dependency[v] += contribution;
        }
    }

    scores
}
