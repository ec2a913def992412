use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::export::{self, ExportFormat, ExportStats};
use crate::graph::{Graph, NodeId};
use crate::search::{
    needs_exhaustive_search, resolve_strategy, search_from, AnomalyCounts, CancelFlag,
    SearchConfig, SearchStats, SearchStrategy,
};
use crate::table::PathTable;

/// Settings for an all-pairs run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub search: SearchConfig,
    /// Worker threads for [`PathOptimizer::optimize_all`]; `1` runs on the
    /// calling thread and `0` uses one worker per core.
    pub jobs: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            jobs: 1,
        }
    }
}

impl OptimizerConfig {
    /// Read a JSON configuration file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading optimizer config");
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.search.validate()
    }
}

/// Source whose search did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: NodeId,
    pub reason: String,
}

/// Totals over every source handled by [`PathOptimizer::optimize_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimizationSummary {
    pub sources: usize,
    pub optimized: usize,
    /// Sources whose row was already written before the run.
    pub skipped: usize,
    pub failed: Vec<SourceFailure>,
    pub expansions: usize,
    pub labels_created: usize,
    pub labels_pruned: usize,
    pub labels_kept: usize,
    pub anomalies: AnomalyCounts,
    pub strategy: SearchStrategy,
    /// Searches kept dominated labels expandable; see
    /// [`needs_exhaustive_search`].
    pub exhaustive: bool,
    pub jobs: usize,
}

impl OptimizationSummary {
    fn absorb(&mut self, stats: SearchStats) {
        self.optimized += 1;
        self.expansions += stats.expansions;
        self.labels_created += stats.labels_created;
        self.labels_pruned += stats.labels_pruned;
        self.labels_kept += stats.labels_kept;
        self.anomalies += stats.anomalies;
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns a graph and its path table and drives per-source searches.
#[derive(Debug)]
pub struct PathOptimizer {
    graph: Graph,
    table: PathTable,
    config: OptimizerConfig,
    cancel: CancelFlag,
}

impl PathOptimizer {
    /// Prepare an empty table sized for `graph`.
    pub fn new(graph: Graph, config: OptimizerConfig) -> Result<Self> {
        config.validate()?;

        let requested = config.search.strategy;
        let strategy = resolve_strategy(&graph, requested);
        if strategy != requested {
            warn!(
                requested = %requested,
                using = %strategy,
                "label-setting needs minimised additive criteria with non-negative costs; falling back"
            );
        }
        if needs_exhaustive_search(&graph, &config.search) {
            info!("dominated labels stay expandable; searching every elementary path");
        }

        let table = PathTable::new(graph.node_count());
        Ok(Self {
            graph,
            table,
            config,
            cancel: CancelFlag::new(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn table(&self) -> &PathTable {
        &self.table
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Handle that cancels running and future searches of this optimizer.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Strategy the searches will actually use on this graph.
    pub fn strategy(&self) -> SearchStrategy {
        resolve_strategy(&self.graph, self.config.search.strategy)
    }

    /// Search from `source` and write its row.
    ///
    /// A failed search leaves the row unwritten.
    pub fn optimize_source(&self, source: NodeId) -> Result<SearchStats> {
        if self.table.is_written(source) {
            return Err(Error::DuplicateWrite { origin: source });
        }
        let outcome = search_from(&self.graph, source, &self.config.search, &self.cancel)?;
        self.table.write_row(outcome.row)?;
        Ok(outcome.stats)
    }

    /// Optimize every source whose row is not yet written.
    ///
    /// Sources that hit the expansion cap or are cancelled are listed in the
    /// summary; any other error aborts the run.
    pub fn optimize_all(&self) -> Result<OptimizationSummary> {
        let pending: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|source| !self.table.is_written(*source))
            .collect();

        let mut summary = OptimizationSummary {
            sources: self.graph.node_count(),
            skipped: self.graph.node_count() - pending.len(),
            strategy: self.strategy(),
            exhaustive: needs_exhaustive_search(&self.graph, &self.config.search),
            jobs: self.config.jobs,
            ..OptimizationSummary::default()
        };

        let results: Vec<(NodeId, Result<SearchStats>)> = if self.config.jobs == 1 {
            pending
                .iter()
                .map(|&source| (source, self.optimize_source(source)))
                .collect()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .thread_name(|index| format!("paretopath-worker-{index}"))
                .build()
                .map_err(|err| Error::InvalidConfig {
                    message: format!("failed to start worker pool: {err}"),
                })?;
            debug!(threads = pool.current_num_threads(), "optimizing sources in parallel");
            pool.install(|| {
                pending
                    .par_iter()
                    .map(|&source| (source, self.optimize_source(source)))
                    .collect()
            })
        };

        for (source, result) in results {
            match result {
                Ok(stats) => summary.absorb(stats),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(source, error = %err, "source not optimized");
                    summary.failed.push(SourceFailure {
                        source,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            optimized = summary.optimized,
            failed = summary.failed.len(),
            labels = summary.labels_kept,
            anomalies = summary.anomalies.total(),
            strategy = %summary.strategy,
            "all-pairs optimization finished"
        );
        Ok(summary)
    }

    pub fn export<W: Write>(&self, sink: W, format: ExportFormat) -> Result<ExportStats> {
        export::export(&self.table, &self.graph, sink, format)
    }

    /// Clear every row so the graph can be optimized again.
    pub fn reset(&mut self) {
        self.table.reset();
    }

    pub fn into_table(self) -> PathTable {
        self.table
    }
}
