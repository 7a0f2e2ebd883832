//! CSV edge-list loading

use crate::error::Result;
use crate::graph::CommunityGraph;
use std::io::Read;
use std::path::Path;

/// Load an undirected graph from a CSV edge list
///
/// Rows are `source,target[,weight]`; a missing or unparsable weight
/// defaults to 1.0. Duplicate pairs accumulate weight, self-loops and
/// short rows are skipped with a warning.
pub fn load_edge_list<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<CommunityGraph> {
    log::info!("Loading edge list from {}", path.as_ref().display());

    let reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let graph = read_edges(reader)?;

    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Read edges from any CSV source into a graph
pub fn read_edges<R: Read>(mut reader: csv::Reader<R>) -> Result<CommunityGraph> {
    let mut graph = CommunityGraph::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let (Some(source), Some(target)) = (record.get(0), record.get(1)) else {
            skipped += 1;
            continue;
        };
        if source.is_empty() || target.is_empty() {
            skipped += 1;
            continue;
        }

        let weight = record
            .get(2)
            .and_then(|w| w.parse::<f64>().ok())
            .unwrap_or(1.0);
        if !graph.add_edge(source, target, weight) {
            skipped += 1;
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed or self-loop rows", skipped);
    }
    Ok(graph)
}
