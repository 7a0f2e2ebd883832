//! Error types for the community analyzer

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by graph loading, clustering and result persistence
#[derive(Debug, Error)]
pub enum Error {
    /// A community-count parameter outside the valid domain for the graph
    #[error("cannot form {requested} communities from {node_count} nodes")]
    InvalidClusterCount { requested: usize, node_count: usize },

    /// An edge-removal parameter larger than the number of edges
    #[error("cannot remove {requested} edges from a graph with {edge_count} edges")]
    InvalidRemovalCount { requested: usize, edge_count: usize },

    /// A run property that could not be interpreted
    #[error("invalid value {value:?} for property {key:?}")]
    InvalidProperty { key: String, value: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
