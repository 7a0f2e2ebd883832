use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;

mod community;
mod config;
mod data;
mod error;
mod graph;
mod manager;
mod storage;

use community::AlgorithmKind;
use config::Config;
use manager::AlgorithmManager;

#[derive(Parser, Debug)]
#[clap(
    name = "graph-community-analyzer",
    about = "Community detection and comparative evaluation on undirected graphs"
)]
struct Cli {
    /// Path to input CSV edge list (source,target[,weight])
    #[clap(long)]
    input: String,

    /// Treat the first CSV row as a header
    #[clap(long)]
    has_headers: bool,

    /// Algorithm for a single labeling run: louvain, girvan-newman,
    /// improved-girvan-newman, wu-huberman or fast-newman
    #[clap(long)]
    algorithm: Option<AlgorithmKind>,

    /// Algorithm parameter: edges to remove (girvan-newman) or target
    /// community count (improved-girvan-newman, wu-huberman)
    #[clap(long, default_value = "2")]
    param: usize,

    /// Run all four algorithm families and save a comparison instead
    #[clap(long)]
    compare: bool,

    /// Community-count override for the comparative run
    #[clap(long)]
    comm: Option<usize>,

    /// Output directory for comparative results
    #[clap(long, default_value = "community_results")]
    output_dir: String,

    /// RNG seed for the voltage clusterer
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    // 1. Load the graph
    let mut graph = data::edgelist::load_edge_list(&args.input, args.has_headers)?;

    // 2. Set up the manager with an event channel for progress reporting
    let config = Config {
        seed: args.seed,
        ..Config::default()
    };
    let (events, progress) = crossbeam::channel::unbounded();
    let mut manager = AlgorithmManager::new(config).with_events(events);

    if args.compare {
        // 3a. Comparative run across all four families
        let mut properties = HashMap::new();
        if let Some(comm) = args.comm {
            properties.insert("comm".to_string(), comm.to_string());
        }

        let results = manager.compute_all(&properties, &graph)?;
        for result in &results {
            log::info!(
                "{}: {} communities, modularity {:.4}, {} ms",
                result.algorithm,
                result.communities.len(),
                result.modularity,
                result.elapsed_ms
            );
        }
        storage::save_results(&results, &graph, &args.output_dir)?;
    } else {
        // 3b. Single labeling run with the selected algorithm
        if args.algorithm.is_none() {
            log::warn!("No algorithm selected; pass --algorithm or --compare");
        }
        manager.set_algorithm(args.algorithm);
        let groups = manager.compute_single(&mut graph, args.param)?;
        log::info!("Assigned {} community labels", groups);
        println!("{groups}");
    }

    // 4. Drain progress events for diagnostics
    for event in progress.try_iter() {
        log::debug!("{event:?}");
    }

    Ok(())
}
