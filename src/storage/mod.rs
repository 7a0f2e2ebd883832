//! Results persistence module

use crate::community::metrics;
use crate::error::Result;
use crate::graph::CommunityGraph;
use crate::manager::RunResult;
use itertools::Itertools;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save comparative run results to the specified directory
pub fn save_results(
    results: &[RunResult],
    graph: &CommunityGraph,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} run results to {}", results.len(), output_dir);

    fs::create_dir_all(output_dir)?;
    save_summary(results, graph, output_dir)?;
    save_runs(results, graph, output_dir)?;

    log::info!("Results saved successfully");
    Ok(())
}

/// Save the comparison table and graph statistics
fn save_summary(results: &[RunResult], graph: &CommunityGraph, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let runs: Vec<_> = results
        .iter()
        .map(|result| {
            let (smallest, largest) = result
                .communities
                .iter()
                .map(Vec::len)
                .minmax()
                .into_option()
                .unwrap_or((0, 0));
            json!({
                "algorithm": result.algorithm,
                "communities": result.communities.len(),
                "modularity": result.modularity,
                "elapsed_ms": result.elapsed_ms,
                "largest_community": largest,
                "smallest_community": smallest,
            })
        })
        .collect();

    let node_count = graph.node_count();
    let summary = json!({
        "graph_stats": {
            "node_count": node_count,
            "edge_count": graph.edge_count(),
            "total_edge_weight": graph.total_edge_weight(),
            "avg_degree": if node_count == 0 {
                0.0
            } else {
                2.0 * graph.edge_count() as f64 / node_count as f64
            },
        },
        "runs": runs,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;
    Ok(())
}

/// Save one document per run with node IDs resolved
fn save_runs(results: &[RunResult], graph: &CommunityGraph, output_dir: &str) -> Result<()> {
    let runs_dir = Path::new(output_dir).join("runs");
    fs::create_dir_all(&runs_dir)?;

    for result in results {
        let path = runs_dir.join(format!("{}.json", result.algorithm.to_lowercase()));
        let mut file = File::create(path)?;

        let communities: Vec<_> = result
            .communities
            .iter()
            .map(|members| {
                let ids: Vec<&str> = members
                    .iter()
                    .map(|&node| graph.node(node).id.as_str())
                    .collect();
                json!({
                    "size": members.len(),
                    "density": metrics::community_density(graph, members),
                    "members": ids,
                })
            })
            .collect();

        let run = json!({
            "algorithm": result.algorithm,
            "elapsed_ms": result.elapsed_ms,
            "modularity": result.modularity,
            "properties": result.properties,
            "communities": communities,
        });
        file.write_all(to_string_pretty(&run)?.as_bytes())?;
    }

    Ok(())
}
