//! Wu-Huberman voltage clustering
//!
//! Treats the graph as a resistor network: a unit voltage is applied across
//! a sampled source/sink pair, interior voltages are relaxed by repeated
//! neighbor averaging (edge weights as conductances), and the block is cut
//! where the voltage gap is widest via a two-means split. Splitting the
//! largest block repeats until the requested community count is reached;
//! internally disconnected blocks split along component boundaries first.
//!
//! Source/sink sampling uses a caller-provided seed, so runs are
//! reproducible.

use super::{CommunityDetector, Partition};
use crate::error::{Error, Result};
use crate::graph::algorithms::connected_components_of;
use crate::graph::CommunityGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VOLTAGE_TOLERANCE: f64 = 1e-6;
const TWO_MEANS_ROUNDS: usize = 32;

/// Voltage-based divisive clusterer
#[derive(Debug, Clone)]
pub struct WuHuberman {
    clusters: usize,
    seed: u64,
    max_sweeps: usize,
}

impl WuHuberman {
    /// Create a clusterer producing exactly `clusters` communities
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters,
            seed: 42,
            max_sweeps: 100,
        }
    }

    /// Seed for source/sink sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of relaxation sweeps per bisection
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Split one block in two
    ///
    /// A disconnected block splits along its first component boundary;
    /// a connected one is cut by voltages between a sampled pair.
    fn bisect(
        &self,
        weighted: &[Vec<(usize, f64)>],
        plain: &[Vec<usize>],
        members: &[usize],
        rng: &mut StdRng,
    ) -> (Vec<usize>, Vec<usize>) {
        let components = connected_components_of(plain, members);
        if components.len() > 1 {
            let first = components[0].clone();
            let mut rest: Vec<usize> = components[1..].concat();
            rest.sort_unstable();
            return (first, rest);
        }

        let source = members[rng.gen_range(0..members.len())];
        let sink = loop {
            let candidate = members[rng.gen_range(0..members.len())];
            if candidate != source {
                break candidate;
            }
        };

        let voltages = self.relax(weighted, members, source, sink);
        let (low, high) = two_means_split(&voltages, members);

        // Blocks stay sorted, so the first member is the smallest; the half
        // holding it keeps the block's slot
        let smallest = members[0];
        if low.contains(&smallest) {
            (low, high)
        } else {
            (high, low)
        }
    }

    /// Gauss-Seidel voltage relaxation with the source pinned to 1 and the
    /// sink to 0
    fn relax(
        &self,
        weighted: &[Vec<(usize, f64)>],
        members: &[usize],
        source: usize,
        sink: usize,
    ) -> Vec<f64> {
        let mut in_block = vec![false; weighted.len()];
        for &u in members {
            in_block[u] = true;
        }

        let mut voltages = vec![0.5; weighted.len()];
        voltages[source] = 1.0;
        voltages[sink] = 0.0;

        for _ in 0..self.max_sweeps {
            let mut max_delta: f64 = 0.0;
            for &u in members {
                if u == source || u == sink {
                    continue;
                }
                let mut acc = 0.0;
                let mut total = 0.0;
                for &(v, w) in &weighted[u] {
                    if in_block[v] {
                        acc += w * voltages[v];
                        total += w;
                    }
                }
                if total > 0.0 {
                    let next = acc / total;
                    max_delta = max_delta.max((next - voltages[u]).abs());
                    voltages[u] = next;
                }
            }
            if max_delta < VOLTAGE_TOLERANCE {
                break;
            }
        }

        voltages
    }
}

/// Partition the block at the widest voltage gap via 1-d two-means
fn two_means_split(voltages: &[f64], members: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut low_center = members
        .iter()
        .map(|&u| voltages[u])
        .fold(f64::INFINITY, f64::min);
    let mut high_center = members
        .iter()
        .map(|&u| voltages[u])
        .fold(f64::NEG_INFINITY, f64::max);

    let mut low = Vec::new();
    let mut high = Vec::new();
    for _ in 0..TWO_MEANS_ROUNDS {
        low.clear();
        high.clear();
        for &u in members {
            if voltages[u] - low_center <= high_center - voltages[u] {
                low.push(u);
            } else {
                high.push(u);
            }
        }

        let next_low = low.iter().map(|&u| voltages[u]).sum::<f64>() / low.len() as f64;
        let next_high = high.iter().map(|&u| voltages[u]).sum::<f64>() / high.len() as f64;
        if (next_low - low_center).abs() < VOLTAGE_TOLERANCE
            && (next_high - high_center).abs() < VOLTAGE_TOLERANCE
        {
            break;
        }
        low_center = next_low;
        high_center = next_high;
    }

    (low, high)
}

impl CommunityDetector for WuHuberman {
    fn communities(&self, graph: &CommunityGraph) -> Result<Partition> {
        let n = graph.node_count();
        if self.clusters == 0 || self.clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.clusters,
                node_count: n,
            });
        }

        let weighted = graph.weighted_adjacency();
        let plain = graph.adjacency();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut blocks: Vec<Vec<usize>> = vec![(0..n).collect()];
        while blocks.len() < self.clusters {
            // Largest block next; the first one wins ties
            let mut split_at = 0;
            for (i, block) in blocks.iter().enumerate() {
                if block.len() > blocks[split_at].len() {
                    split_at = i;
                }
            }

            let block = std::mem::take(&mut blocks[split_at]);
            let (keep, split_off) = self.bisect(&weighted, &plain, &block, &mut rng);
            blocks[split_at] = keep;
            blocks.push(split_off);
        }

        Ok(blocks
            .into_iter()
            .map(|block| block.into_iter().map(|node| node as u32).collect())
            .collect())
    }
}
