//! Algorithm dispatch, node labeling and comparative evaluation

use crate::community::{
    metrics, AlgorithmKind, CommunityDetector, FastNewman, GirvanNewman, Louvain, Partition,
    WuHuberman,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::CommunityGraph;
use crossbeam::channel::Sender;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Observability events emitted while computations run
///
/// Sends are fire-and-forget: a missing or disconnected receiver is
/// ignored.
#[derive(Debug, Clone)]
pub enum ManagerEvent {
    RunStarted {
        algorithm: AlgorithmKind,
    },
    /// Wall-clock time of the algorithm call itself, excluding label
    /// assignment
    RunTimed {
        algorithm: AlgorithmKind,
        elapsed: Duration,
    },
    /// A labeling run finished and the graph carries fresh groups
    ResultsChanged,
}

/// Outcome of one comparative algorithm run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Family code: LV, FN, WH or GN
    pub algorithm: String,

    /// Discovered partition, as node indices per community
    pub communities: Partition,

    /// Wall-clock duration of the algorithm call
    pub elapsed_ms: u64,

    /// Caller-supplied properties plus the algorithm tag
    pub properties: HashMap<String, String>,

    /// Newman modularity of the partition against the input graph
    pub modularity: f64,
}

/// Selects, runs and evaluates the clustering algorithms
///
/// Calls are synchronous and CPU-bound; callers that need a responsive
/// thread run them on a worker. A single manager services one computation
/// at a time.
pub struct AlgorithmManager {
    algorithm: Option<AlgorithmKind>,
    config: Config,
    events: Option<Sender<ManagerEvent>>,
}

impl AlgorithmManager {
    pub fn new(config: Config) -> Self {
        Self {
            algorithm: None,
            config,
            events: None,
        }
    }

    /// Attach an event channel for progress and refresh signals
    pub fn with_events(mut self, events: Sender<ManagerEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Select the algorithm used by [`Self::compute_single`]
    pub fn set_algorithm(&mut self, algorithm: Option<AlgorithmKind>) {
        self.algorithm = algorithm;
    }

    pub fn algorithm(&self) -> Option<AlgorithmKind> {
        self.algorithm
    }

    fn notify(&self, event: ManagerEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    /// Build the detector for a variant, interpreting `param` per family:
    /// edges to remove (GirvanNewman), target community count
    /// (ImprovedGirvanNewman, WuHuberman), ignored otherwise
    fn detector(&self, kind: AlgorithmKind, param: usize) -> Box<dyn CommunityDetector> {
        match kind {
            AlgorithmKind::Louvain => {
                Box::new(Louvain::new().with_max_sweeps(self.config.max_sweeps))
            }
            AlgorithmKind::GirvanNewman => Box::new(GirvanNewman::remove_edges(param)),
            AlgorithmKind::ImprovedGirvanNewman => Box::new(GirvanNewman::with_target(param)),
            AlgorithmKind::WuHuberman => Box::new(
                WuHuberman::new(param)
                    .with_seed(self.config.seed)
                    .with_max_sweeps(self.config.max_sweeps),
            ),
            AlgorithmKind::FastNewman => Box::new(FastNewman::new()),
        }
    }

    fn timed_run(
        &self,
        kind: AlgorithmKind,
        param: usize,
        graph: &CommunityGraph,
    ) -> Result<(Partition, Duration)> {
        self.notify(ManagerEvent::RunStarted { algorithm: kind });

        let detector = self.detector(kind, param);
        let started = Instant::now();
        let partition = detector.communities(graph)?;
        let elapsed = started.elapsed();

        self.notify(ManagerEvent::RunTimed {
            algorithm: kind,
            elapsed,
        });
        Ok((partition, elapsed))
    }

    /// Run the selected algorithm and stamp group labels onto the graph
    ///
    /// Every node receives its community's 0-based index, in the order the
    /// algorithm returned the communities. Returns the community count.
    /// With no algorithm selected this is a no-op returning 0. A failing
    /// algorithm propagates its error and leaves every label untouched.
    pub fn compute_single(&self, graph: &mut CommunityGraph, param: usize) -> Result<usize> {
        let Some(kind) = self.algorithm else {
            self.notify(ManagerEvent::ResultsChanged);
            return Ok(0);
        };

        let (partition, _elapsed) = self.timed_run(kind, param, graph)?;
        for (index, community) in partition.iter().enumerate() {
            for &node in community {
                graph.set_group(node, index.to_string());
            }
        }

        self.notify(ManagerEvent::ResultsChanged);
        Ok(partition.len())
    }

    /// Run all four algorithm families for side-by-side comparison
    ///
    /// Louvain and Fast-Newman run first; Wu-Huberman and Girvan-Newman
    /// then use the ceiling of the two discovered community counts'
    /// average, unless a `"comm"` property overrides it. Results come back
    /// in the fixed order [LV, FN, WH, GN]. Node labels are never touched,
    /// and any failure aborts the whole call.
    pub fn compute_all(
        &self,
        properties: &HashMap<String, String>,
        graph: &CommunityGraph,
    ) -> Result<Vec<RunResult>> {
        let (louvain, louvain_elapsed) = self.timed_run(AlgorithmKind::Louvain, 0, graph)?;
        let (fast_newman, fast_newman_elapsed) =
            self.timed_run(AlgorithmKind::FastNewman, 0, graph)?;

        let candidates = match properties.get("comm") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::InvalidProperty {
                    key: "comm".to_string(),
                    value: raw.clone(),
                })?,
            None => (louvain.len() + fast_newman.len()).div_ceil(2),
        };

        let (wu_huberman, wu_huberman_elapsed) =
            self.timed_run(AlgorithmKind::WuHuberman, candidates, graph)?;
        let (girvan_newman, girvan_newman_elapsed) =
            self.timed_run(AlgorithmKind::ImprovedGirvanNewman, candidates, graph)?;

        Ok(vec![
            run_result(AlgorithmKind::Louvain, louvain, louvain_elapsed, properties, graph),
            run_result(
                AlgorithmKind::FastNewman,
                fast_newman,
                fast_newman_elapsed,
                properties,
                graph,
            ),
            run_result(
                AlgorithmKind::WuHuberman,
                wu_huberman,
                wu_huberman_elapsed,
                properties,
                graph,
            ),
            run_result(
                AlgorithmKind::ImprovedGirvanNewman,
                girvan_newman,
                girvan_newman_elapsed,
                properties,
                graph,
            ),
        ])
    }
}

fn run_result(
    kind: AlgorithmKind,
    communities: Partition,
    elapsed: Duration,
    caller_properties: &HashMap<String, String>,
    graph: &CommunityGraph,
) -> RunResult {
    let mut properties = caller_properties.clone();
    properties.insert("algorithm".to_string(), kind.code().to_string());
    let modularity = metrics::modularity(graph, &communities);

    RunResult {
        algorithm: kind.code().to_string(),
        communities,
        elapsed_ms: elapsed.as_millis() as u64,
        properties,
        modularity,
    }
}
