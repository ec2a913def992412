use std::fmt::Write;

use serde::Serialize;

use paretopath_lib::{ExportStats, ExportedTable, Graph, OptimizationSummary, SearchStrategy};

/// Shape of a loaded graph as reported by `paretopath stats`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub criteria: Vec<String>,
    pub named_nodes: bool,
    pub non_negative_costs: bool,
    /// Whether `--strategy setting` would run as requested.
    pub label_setting_eligible: bool,
    /// Whether dominated labels can be discarded before expansion.
    pub extension_monotone: bool,
}

impl GraphStats {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            criteria: graph.criteria().iter().map(ToString::to_string).collect(),
            named_nodes: graph.has_named_nodes(),
            non_negative_costs: graph.has_non_negative_costs(),
            label_setting_eligible: paretopath_lib::search::resolve_strategy(
                graph,
                SearchStrategy::LabelSetting,
            ) == SearchStrategy::LabelSetting,
            extension_monotone: graph.is_extension_monotone(),
        }
    }

    pub fn render(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Nodes:    {}", self.nodes);
        let _ = writeln!(buffer, "Edges:    {}", self.edges);
        if self.criteria.is_empty() {
            let _ = writeln!(buffer, "Criteria: (none)");
        } else {
            let _ = writeln!(buffer, "Criteria: {}", self.criteria.join(" "));
        }
        let _ = writeln!(buffer, "Named nodes: {}", yes_no(self.named_nodes));
        let _ = writeln!(
            buffer,
            "Label-setting eligible: {}",
            yes_no(self.label_setting_eligible)
        );
        let _ = writeln!(
            buffer,
            "Extension-monotone: {}",
            yes_no(self.extension_monotone)
        );
        buffer
    }
}

/// Run report written to stderr after `paretopath optimize`.
pub fn render_summary(summary: &OptimizationSummary, export: &ExportStats) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Optimized {} of {} sources ({}, {} job{})",
        summary.optimized,
        summary.sources,
        summary.strategy,
        summary.jobs,
        if summary.jobs == 1 { "" } else { "s" }
    );
    if summary.exhaustive {
        let _ = writeln!(buffer, "Exhaustive search: dominated labels kept expandable");
    }
    let _ = writeln!(
        buffer,
        "Labels: {} kept, {} pruned, {} expansions",
        summary.labels_kept, summary.labels_pruned, summary.expansions
    );
    let _ = writeln!(
        buffer,
        "Exported {} pairs with {} paths",
        export.pairs, export.labels
    );

    let anomalies = &summary.anomalies;
    if anomalies.total() > 0 {
        let _ = writeln!(
            buffer,
            "Anomalies: {} degenerate cycles, {} over cost bound, {} non-finite",
            anomalies.degenerate_cycles, anomalies.bound_exceeded, anomalies.non_finite
        );
    }
    for failure in &summary.failed {
        let _ = writeln!(buffer, "Failed source {}: {}", failure.source, failure.reason);
    }
    buffer
}

/// Report written by `paretopath check`.
pub fn render_check(table: &ExportedTable) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "Nodes:    {}", table.node_count);
    let _ = writeln!(buffer, "Criteria: {}", table.criteria.len());
    let _ = writeln!(buffer, "Pairs:    {}", table.pairs.len());
    let _ = writeln!(buffer, "Paths:    {}", table.label_count());
    buffer
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
