//! Configuration for the community analyzer engine

/// Tuning knobs shared by the clustering algorithms
pub struct Config {
    /// Seed for the voltage clusterer's source/sink sampling
    pub seed: u64,

    /// Iteration cap for sweep-based phases (local moves, voltage relaxation)
    pub max_sweeps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 42,
            max_sweeps: 100,
        }
    }
}

impl Config {
    /// Create a configuration with custom values
    pub fn new(seed: u64, max_sweeps: usize) -> Self {
        Self { seed, max_sweeps }
    }
}
