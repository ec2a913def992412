//! Paretopath library entry points.
//!
//! This crate loads a multi-criteria directed graph, computes the exact set
//! of non-dominated elementary paths between every ordered pair of nodes, and
//! exports the resulting path table. The CLI and benchmarks should only depend
//! on the items re-exported here.
//!
//! ```no_run
//! use paretopath_lib::{load_graph_file, ExportFormat, OptimizerConfig, PathOptimizer};
//!
//! # fn main() -> paretopath_lib::Result<()> {
//! let graph = load_graph_file("network.txt".as_ref())?;
//! let optimizer = PathOptimizer::new(graph, OptimizerConfig::default())?;
//! optimizer.optimize_all()?;
//! optimizer.export(std::io::stdout().lock(), ExportFormat::Text)?;
//! # Ok(())
//! # }
//! ```

pub mod cost;
pub mod criteria;
pub mod dominance;
pub mod error;
pub mod export;
pub mod graph;
pub mod label;
pub mod loader;
pub mod optimizer;
pub mod search;
pub mod table;

pub use cost::CostVector;
pub use criteria::{Combination, Criteria, Criterion, Optimization};
pub use dominance::{dominates, EqualCostPolicy, ParetoFront};
pub use error::{Error, Result};
pub use export::{export, parse_export, ExportFormat, ExportStats, ExportedTable};
pub use graph::{Edge, Graph, GraphBuilder, NodeId, NodeInfo};
pub use label::{Label, LabelArena, LabelId};
pub use loader::{load_graph, load_graph_file, load_graph_str};
pub use optimizer::{OptimizationSummary, OptimizerConfig, PathOptimizer, SourceFailure};
pub use search::{
    needs_exhaustive_search, search_from, Anomaly, AnomalyCounts, CancelFlag, SearchConfig,
    SearchOutcome, SearchStats, SearchStrategy, DEFAULT_MAX_EXPANSIONS,
};
pub use table::{FrontView, PairEntry, ParetoPath, PathTable, SourceRow, TableSnapshot};
