//! Single-source multi-criteria label search.
//!
//! Starting from one source node the search keeps, for every node, the set of
//! non-dominated labels found so far. Labels are expanded from a work queue;
//! each extension along an edge is offered to the target's [`ParetoFront`]
//! and queued again only if it survives. The search ends when the queue is
//! empty, at which point every front holds the exact non-dominated set of
//! elementary paths from the source.
//!
//! Two queue disciplines are available:
//!
//! - [`SearchStrategy::LabelCorrecting`] (default) expands labels in FIFO
//!   order. A label may later be dominated by one found through a longer hop
//!   count; such labels are marked dead and skipped when popped.
//! - [`SearchStrategy::LabelSetting`] expands the lexicographically smallest
//!   cost first. With non-negative, minimised, additive criteria an expanded
//!   label can never be dominated afterwards, so far fewer labels are
//!   corrected. Graphs that do not meet those conditions fall back to the
//!   correcting variant.
//!
//! Paths are elementary. An extension that would revisit a node already on
//! its own path is dropped; when the revisit costs exactly what the label it
//! returns to costs (a cycle that changes nothing) the drop is counted as an
//! [`Anomaly::DegenerateCycle`]. Anomalies never abort a search.
//!
//! Evicting a dominated label before it is expanded is only exact when no
//! edge can improve a criterion ([`Graph::is_extension_monotone`]). Otherwise
//! a dominated label may be the only one able to reach a node that lies on
//! the path of the label dominating it, so the search runs exhaustively:
//! every elementary extension stays expandable and the fronts only decide
//! what is reported. See [`needs_exhaustive_search`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::cost::CostVector;
use crate::dominance::{Costed, EqualCostPolicy, Insertion, ParetoFront};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::label::{LabelArena, LabelId};
use crate::table::SourceRow;

/// Default cap on label expansions for a single source.
pub const DEFAULT_MAX_EXPANSIONS: usize = 1_000_000;

/// Queue discipline used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// FIFO expansion; exact for any criteria.
    #[default]
    LabelCorrecting,
    /// Lexicographic min-first expansion; requires monotone criteria.
    LabelSetting,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchStrategy::LabelCorrecting => "label-correcting",
            SearchStrategy::LabelSetting => "label-setting",
        };
        f.write_str(value)
    }
}

/// Tunables for a single-source search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    /// Abort the source once this many labels have been expanded.
    pub max_expansions: Option<usize>,
    /// Discard labels with any component whose magnitude exceeds this bound.
    pub cost_bound: Option<f64>,
    /// Keep distinct paths whose cost vectors tie exactly.
    pub keep_equal_cost_paths: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::LabelCorrecting,
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
            cost_bound: None,
            keep_equal_cost_paths: false,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_expansions == Some(0) {
            return Err(Error::InvalidConfig {
                message: "max_expansions must be at least 1".to_string(),
            });
        }
        if let Some(bound) = self.cost_bound {
            if bound.is_nan() || bound <= 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("cost_bound must be positive, got {bound}"),
                });
            }
        }
        Ok(())
    }

    pub fn equal_cost_policy(&self) -> EqualCostPolicy {
        if self.keep_equal_cost_paths {
            EqualCostPolicy::Keep
        } else {
            EqualCostPolicy::Reject
        }
    }
}

/// Strategy that will actually run for `graph` when `requested` is asked for.
///
/// Label-setting is only exact when extending a path can never improve any
/// criterion; otherwise the correcting variant is used.
pub fn resolve_strategy(graph: &Graph, requested: SearchStrategy) -> SearchStrategy {
    match requested {
        SearchStrategy::LabelSetting
            if graph.criteria().is_monotone() && graph.has_non_negative_costs() =>
        {
            SearchStrategy::LabelSetting
        }
        _ => SearchStrategy::LabelCorrecting,
    }
}

/// `true` when the search from any source of `graph` must keep dominated
/// labels expandable to stay exact.
///
/// That is the case when an edge can improve a criterion, and when ties are
/// kept under a bottleneck rule: a label evicted by a strictly better one can
/// still extend into a path that only ties the evictor's extension.
pub fn needs_exhaustive_search(graph: &Graph, config: &SearchConfig) -> bool {
    !graph.is_extension_monotone()
        || (config.keep_equal_cost_paths && !graph.criteria().preserves_strict_preference())
}

/// Shared flag an external caller sets to abandon running searches.
///
/// Searches poll it each time they take a label off the queue.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Per-label numerical problem; the label is dropped and the search goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Extension closes a cycle that does not worsen the path it returns to.
    DegenerateCycle,
    /// Extension has a component beyond the configured cost bound.
    BoundExceeded,
    /// Extension has a NaN or infinite component.
    NonFiniteCost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyCounts {
    pub degenerate_cycles: usize,
    pub bound_exceeded: usize,
    pub non_finite: usize,
}

impl AnomalyCounts {
    pub fn record(&mut self, anomaly: Anomaly) {
        match anomaly {
            Anomaly::DegenerateCycle => self.degenerate_cycles += 1,
            Anomaly::BoundExceeded => self.bound_exceeded += 1,
            Anomaly::NonFiniteCost => self.non_finite += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.degenerate_cycles + self.bound_exceeded + self.non_finite
    }
}

impl AddAssign for AnomalyCounts {
    fn add_assign(&mut self, other: Self) {
        self.degenerate_cycles += other.degenerate_cycles;
        self.bound_exceeded += other.bound_exceeded;
        self.non_finite += other.non_finite;
    }
}

/// Counters describing one source's search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Labels taken off the queue and extended.
    pub expansions: usize,
    /// Labels added to the arena, including the root.
    pub labels_created: usize,
    /// Extensions rejected or later evicted by dominance.
    pub labels_pruned: usize,
    /// Labels in the final fronts.
    pub labels_kept: usize,
    pub anomalies: AnomalyCounts,
    /// Dominated labels were kept expandable.
    pub exhaustive: bool,
}

/// Completed search for one source, ready to be written to the path table.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub row: SourceRow,
    pub stats: SearchStats,
    pub strategy: SearchStrategy,
}

/// Compute the non-dominated label set of every node reachable from `source`.
pub fn search_from(
    graph: &Graph,
    source: NodeId,
    config: &SearchConfig,
    cancel: &CancelFlag,
) -> Result<SearchOutcome> {
    if !graph.contains(source) {
        return Err(Error::NodeOutOfRange {
            node: source,
            node_count: graph.node_count(),
        });
    }

    let strategy = resolve_strategy(graph, config.strategy);
    if strategy != config.strategy {
        debug!(source, requested = %config.strategy, using = %strategy, "strategy fallback");
    }

    let (row, stats) = match strategy {
        SearchStrategy::LabelCorrecting => {
            LabelSearch::new(graph, source, config, cancel).run(FifoQueue::default())?
        }
        SearchStrategy::LabelSetting => {
            LabelSearch::new(graph, source, config, cancel).run(LexicographicQueue::default())?
        }
    };

    debug!(
        source,
        expansions = stats.expansions,
        labels = stats.labels_kept,
        destinations = row.destination_count(),
        "source optimized"
    );
    if stats.anomalies.total() > 0 {
        warn!(
            source,
            degenerate_cycles = stats.anomalies.degenerate_cycles,
            bound_exceeded = stats.anomalies.bound_exceeded,
            non_finite = stats.anomalies.non_finite,
            "discarded anomalous labels"
        );
    }

    Ok(SearchOutcome {
        row,
        stats,
        strategy,
    })
}

/// Work queue of labels awaiting expansion.
trait LabelQueue {
    fn push(&mut self, id: LabelId, cost: &CostVector);
    fn pop(&mut self) -> Option<LabelId>;
}

#[derive(Debug, Default)]
struct FifoQueue(VecDeque<LabelId>);

impl LabelQueue for FifoQueue {
    fn push(&mut self, id: LabelId, _cost: &CostVector) {
        self.0.push_back(id);
    }

    fn pop(&mut self) -> Option<LabelId> {
        self.0.pop_front()
    }
}

#[derive(Debug, Default)]
struct LexicographicQueue(BinaryHeap<LexEntry>);

impl LabelQueue for LexicographicQueue {
    fn push(&mut self, id: LabelId, cost: &CostVector) {
        self.0.push(LexEntry {
            cost: cost.clone(),
            id,
        });
    }

    fn pop(&mut self) -> Option<LabelId> {
        self.0.pop().map(|entry| entry.id)
    }
}

#[derive(Debug)]
struct LexEntry {
    cost: CostVector,
    id: LabelId,
}

impl Ord for LexEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest cost first.
        other
            .cost
            .lexicographic_cmp(&self.cost)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for LexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LexEntry {}

/// Front member: the label handle plus its cost for dominance checks.
#[derive(Debug, Clone)]
struct FrontEntry {
    label: LabelId,
    /// Label this one extends; `None` for the root.
    parent: Option<LabelId>,
    cost: CostVector,
}

impl Costed for FrontEntry {
    fn cost(&self) -> &[f64] {
        &self.cost
    }
}

struct LabelSearch<'a> {
    graph: &'a Graph,
    source: NodeId,
    config: &'a SearchConfig,
    cancel: &'a CancelFlag,
    arena: LabelArena,
    fronts: Vec<ParetoFront<FrontEntry>>,
    /// Indexed by label; `false` once evicted from its front.
    alive: Vec<bool>,
    /// Keep dominated labels expandable.
    exhaustive: bool,
    stats: SearchStats,
}

impl<'a> LabelSearch<'a> {
    fn new(
        graph: &'a Graph,
        source: NodeId,
        config: &'a SearchConfig,
        cancel: &'a CancelFlag,
    ) -> Self {
        Self {
            graph,
            source,
            config,
            cancel,
            arena: LabelArena::new(),
            fronts: (0..graph.node_count()).map(|_| ParetoFront::new()).collect(),
            alive: Vec::new(),
            exhaustive: needs_exhaustive_search(graph, config),
            stats: SearchStats::default(),
        }
    }

    fn run<Q: LabelQueue>(mut self, mut queue: Q) -> Result<(SourceRow, SearchStats)> {
        let criteria = self.graph.criteria();
        let policy = self.config.equal_cost_policy();

        let root_cost = criteria.identity();
        let root = self.arena.push_root(self.source, root_cost.clone());
        self.alive.push(true);
        self.fronts[self.source as usize].insert_with_policy(
            criteria,
            FrontEntry {
                label: root,
                parent: None,
                cost: root_cost.clone(),
            },
            policy,
        );
        self.stats.labels_created = 1;
        self.stats.exhaustive = self.exhaustive;
        queue.push(root, &root_cost);

        while let Some(current) = queue.pop() {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled {
                    origin: self.source,
                });
            }
            if !self.alive[current.index()] {
                continue;
            }

            self.stats.expansions += 1;
            if let Some(limit) = self.config.max_expansions {
                if self.stats.expansions > limit {
                    return Err(Error::ExpansionLimit {
                        origin: self.source,
                        limit,
                    });
                }
            }

            let label = self.arena.get(current);
            let (node, cost) = (label.node, label.cost.clone());

            for edge in self.graph.edges_from(node) {
                let candidate = criteria.combine(&cost, &edge.cost);

                if let Some(anomaly) = self.check_bounds(&candidate) {
                    trace!(source = self.source, node = edge.target, ?anomaly, "label discarded");
                    self.stats.anomalies.record(anomaly);
                    continue;
                }

                if let Some(ancestor) = self.arena.find_on_path(current, edge.target) {
                    if self.arena.get(ancestor).cost == candidate {
                        trace!(
                            source = self.source,
                            node = edge.target,
                            "label closes a cycle that changes nothing"
                        );
                        self.stats.anomalies.record(Anomaly::DegenerateCycle);
                    } else {
                        self.stats.labels_pruned += 1;
                    }
                    continue;
                }

                let id = self.arena.next_id();
                let entry = FrontEntry {
                    label: id,
                    parent: Some(current),
                    cost: candidate.clone(),
                };
                let arena = &self.arena;
                let same_path = |member: &FrontEntry, offered: &FrontEntry| {
                    match (arena.get(member.label).predecessor, offered.parent) {
                        (Some(a), Some(b)) => arena.same_path(a, b),
                        (None, None) => true,
                        _ => false,
                    }
                };
                let insertion = self.fronts[edge.target as usize]
                    .insert_with_policy_by(criteria, entry, policy, same_path);
                let admitted = match insertion {
                    Insertion::Rejected(_) => {
                        self.stats.labels_pruned += 1;
                        false
                    }
                    Insertion::Inserted { evicted } => {
                        self.stats.labels_pruned += evicted.len();
                        if !self.exhaustive {
                            for dead in evicted {
                                self.alive[dead.label.index()] = false;
                            }
                        }
                        true
                    }
                };
                if admitted || self.exhaustive {
                    let pushed = self.arena.push_extension(current, edge.target, candidate);
                    debug_assert_eq!(pushed, id);
                    self.alive.push(true);
                    self.stats.labels_created += 1;
                    queue.push(id, &self.arena.get(id).cost);
                }
            }
        }

        let fronts = self
            .fronts
            .into_iter()
            .enumerate()
            .filter(|(_, front)| !front.is_empty())
            .map(|(node, front)| {
                let labels = front.into_vec().into_iter().map(|entry| entry.label).collect();
                (node as NodeId, labels)
            })
            .collect();

        let row = SourceRow::from_search(self.source, &self.arena, fronts);
        self.stats.labels_kept = row.label_count();
        Ok((row, self.stats))
    }

    fn check_bounds(&self, candidate: &CostVector) -> Option<Anomaly> {
        if !candidate.is_finite() {
            return Some(Anomaly::NonFiniteCost);
        }
        match self.config.cost_bound {
            Some(bound) if candidate.exceeds(bound) => Some(Anomaly::BoundExceeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_graph_str;

    fn run(text: &str, source: NodeId, config: &SearchConfig) -> SearchOutcome {
        let graph = load_graph_str(text).expect("valid graph");
        search_from(&graph, source, config, &CancelFlag::new()).expect("search succeeds")
    }

    fn costs_at(outcome: &SearchOutcome, destination: NodeId) -> Vec<Vec<f64>> {
        outcome
            .row
            .front(destination)
            .map(|front| front.paths().into_iter().map(|p| p.cost.to_vec()).collect())
            .unwrap_or_default()
    }

    const TRIANGLE: &str = "3\n0 1 1 5\n0 2 4 1\n1 2 1 1\n";

    #[test]
    fn incomparable_paths_both_survive() {
        let outcome = run(TRIANGLE, 0, &SearchConfig::default());
        assert_eq!(costs_at(&outcome, 2), vec![vec![2.0, 6.0], vec![4.0, 1.0]]);
        assert_eq!(costs_at(&outcome, 0), vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn dominated_path_is_pruned() {
        let outcome = run("3\n0 1 1 1\n1 2 1 1\n0 2 5 5\n", 0, &SearchConfig::default());
        let front = outcome.row.front(2).expect("reachable");
        let paths = front.paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn unreachable_nodes_have_no_front() {
        let outcome = run(TRIANGLE, 2, &SearchConfig::default());
        assert!(outcome.row.front(0).is_none());
        assert_eq!(outcome.row.destination_count(), 1);
    }

    #[test]
    fn zero_cost_cycle_is_reported_not_followed() {
        let outcome = run("2\n0 1 0 0\n1 0 0 0\n", 0, &SearchConfig::default());
        assert_eq!(outcome.stats.anomalies.degenerate_cycles, 1);
        assert_eq!(costs_at(&outcome, 1), vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn positive_cycle_is_pruned_silently() {
        let outcome = run("2\n0 1 1 1\n1 0 1 1\n", 0, &SearchConfig::default());
        assert_eq!(outcome.stats.anomalies.total(), 0);
        assert!(outcome.stats.labels_pruned >= 1);
    }

    #[test]
    fn cost_bound_discards_expensive_labels() {
        let config = SearchConfig {
            cost_bound: Some(3.0),
            ..SearchConfig::default()
        };
        let outcome = run(TRIANGLE, 0, &config);
        assert_eq!(outcome.stats.anomalies.bound_exceeded, 2);
        assert_eq!(costs_at(&outcome, 1), Vec::<Vec<f64>>::new());
        assert_eq!(costs_at(&outcome, 2), Vec::<Vec<f64>>::new());
    }

    #[test]
    fn expansion_limit_fails_the_source() {
        let graph = load_graph_str(TRIANGLE).expect("valid graph");
        let config = SearchConfig {
            max_expansions: Some(1),
            ..SearchConfig::default()
        };
        let error = search_from(&graph, 0, &config, &CancelFlag::new()).expect_err("limit hit");
        assert!(matches!(error, Error::ExpansionLimit { origin: 0, limit: 1 }));
    }

    #[test]
    fn cancelled_search_returns_error() {
        let graph = load_graph_str(TRIANGLE).expect("valid graph");
        let cancel = CancelFlag::new();
        cancel.cancel();
        let error = search_from(&graph, 0, &SearchConfig::default(), &cancel)
            .expect_err("cancelled before first expansion");
        assert!(matches!(error, Error::Cancelled { origin: 0 }));
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let graph = load_graph_str(TRIANGLE).expect("valid graph");
        let error = search_from(&graph, 3, &SearchConfig::default(), &CancelFlag::new())
            .expect_err("no such node");
        assert!(matches!(error, Error::NodeOutOfRange { node: 3, .. }));
    }

    #[test]
    fn label_setting_matches_label_correcting() {
        let text = "5\n0 1 1 4\n0 2 2 2\n1 3 1 1\n2 3 1 1\n1 2 0 0\n3 4 2 1\n2 4 5 0\n0 4 9 9\n";
        let correcting = run(text, 0, &SearchConfig::default());
        let setting = run(
            text,
            0,
            &SearchConfig {
                strategy: SearchStrategy::LabelSetting,
                ..SearchConfig::default()
            },
        );
        assert_eq!(setting.strategy, SearchStrategy::LabelSetting);
        for node in 0..5 {
            assert_eq!(costs_at(&setting, node), costs_at(&correcting, node));
        }
    }

    #[test]
    fn label_setting_falls_back_on_negative_costs() {
        let graph = load_graph_str("2\n0 1 -1\n").expect("valid graph");
        assert_eq!(
            resolve_strategy(&graph, SearchStrategy::LabelSetting),
            SearchStrategy::LabelCorrecting
        );
    }

    #[test]
    fn equal_cost_paths_are_kept_on_request() {
        let text = "4\n0 1 1\n0 2 1\n1 3 1\n2 3 1\n";
        let strict = run(text, 0, &SearchConfig::default());
        assert_eq!(costs_at(&strict, 3), vec![vec![2.0]]);

        let diverse = run(
            text,
            0,
            &SearchConfig {
                keep_equal_cost_paths: true,
                ..SearchConfig::default()
            },
        );
        let paths = diverse.row.front(3).expect("reachable").paths();
        let routes: Vec<_> = paths.into_iter().map(|p| p.nodes).collect();
        assert_eq!(routes, vec![vec![0, 1, 3], vec![0, 2, 3]]);
    }

    #[test]
    fn maximised_bottleneck_criterion() {
        let text = "\
[metrics]
time|MIN|ADD
capacity|MAX|MIN
[nodes]
a|
b|
c|
[edges]
a|c|time=10,capacity=5
a|b|time=2,capacity=50
b|c|time=2,capacity=40
";
        let outcome = run(text, 0, &SearchConfig::default());
        let paths = outcome.row.front(2).expect("reachable").paths();
        assert_eq!(paths.len(), 1, "via b is faster and wider");
        assert_eq!(paths[0].cost.as_slice(), &[4.0, 40.0]);
        assert_eq!(paths[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn parallel_identical_edges_yield_one_path() {
        let config = SearchConfig {
            keep_equal_cost_paths: true,
            ..SearchConfig::default()
        };
        let outcome = run("2\n0 1 1\n0 1 1\n", 0, &config);
        let paths = outcome.row.front(1).expect("reachable").paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![0, 1]);
    }

    #[test]
    fn maximised_sum_reaches_through_the_dominating_label() {
        let text = "\
[metrics]
score|MAX|ADD
[nodes]
a|
b|
c|
[edges]
a|b|score=1
a|c|score=1
c|b|score=5
b|c|score=5
";
        let outcome = run(text, 0, &SearchConfig::default());
        assert!(outcome.stats.exhaustive);
        assert_eq!(outcome.stats.anomalies.degenerate_cycles, 0);

        let to_b = outcome.row.front(1).expect("reachable").paths();
        assert_eq!(to_b.len(), 1);
        assert_eq!(to_b[0].cost.as_slice(), &[6.0]);
        assert_eq!(to_b[0].nodes, vec![0, 2, 1]);

        let to_c = outcome.row.front(2).expect("reachable").paths();
        assert_eq!(to_c.len(), 1);
        assert_eq!(to_c[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn negative_edges_keep_dominated_prefixes_expandable() {
        let outcome = run("3\n0 1 0\n0 2 5\n2 1 -10\n1 2 -100\n", 0, &SearchConfig::default());
        assert!(outcome.stats.exhaustive);

        let to_1 = outcome.row.front(1).expect("reachable").paths();
        assert_eq!(to_1.len(), 1);
        assert_eq!(to_1[0].cost.as_slice(), &[-5.0]);
        assert_eq!(to_1[0].nodes, vec![0, 2, 1]);

        let to_2 = outcome.row.front(2).expect("reachable").paths();
        assert_eq!(to_2[0].cost.as_slice(), &[-100.0]);
        assert_eq!(to_2[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn non_negative_additive_search_is_not_exhaustive() {
        let outcome = run(TRIANGLE, 0, &SearchConfig::default());
        assert!(!outcome.stats.exhaustive);
    }

    #[test]
    fn kept_ties_under_a_bottleneck_rule_are_all_found() {
        // 0->1->3 and 0->2->3 tie on (2, 5) even though risk into 2 is lower.
        let text = "\
[metrics]
time|MIN|ADD
risk|MIN|MAX
[nodes]
s|
a|
b|
t|
[edges]
s|a|time=1,risk=2
s|b|time=1,risk=1
a|t|time=1,risk=5
b|t|time=1,risk=5
a|b|time=0,risk=2
";
        let graph = load_graph_str(text).expect("valid graph");
        let config = SearchConfig {
            keep_equal_cost_paths: true,
            ..SearchConfig::default()
        };
        assert!(needs_exhaustive_search(&graph, &config));
        assert!(!needs_exhaustive_search(&graph, &SearchConfig::default()));

        let outcome = search_from(&graph, 0, &config, &CancelFlag::new()).expect("search succeeds");
        let routes: Vec<_> = outcome
            .row
            .front(3)
            .expect("reachable")
            .paths()
            .into_iter()
            .map(|path| path.nodes)
            .collect();
        assert_eq!(routes, vec![vec![0, 1, 2, 3], vec![0, 1, 3], vec![0, 2, 3]]);
    }

    #[test]
    fn config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        let zero_cap = SearchConfig {
            max_expansions: Some(0),
            ..SearchConfig::default()
        };
        assert!(zero_cap.validate().is_err());
        let bad_bound = SearchConfig {
            cost_bound: Some(-1.0),
            ..SearchConfig::default()
        };
        assert!(bad_bound.validate().is_err());
    }
}
