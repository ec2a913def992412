//! Shared fixtures and reference helpers for integration tests.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::path::PathBuf;

use paretopath_lib::{CostVector, Criteria, Graph, NodeId, ParetoPath};

/// Path to a graph under `docs/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
}

/// Deterministic linear congruential generator so fixtures are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed ^ 0x5DEE_CE66_D)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

/// Random graph with integer costs in `1..=9` on every one of `criteria` axes.
#[allow(dead_code)]
pub fn random_graph(nodes: usize, edges: usize, criteria: usize, seed: u64) -> Graph {
    let mut rng = Lcg::new(seed);
    let mut builder = Graph::builder(Criteria::minimizing(criteria), nodes);
    for _ in 0..edges {
        let from = rng.below(nodes as u64) as NodeId;
        let to = rng.below(nodes as u64) as NodeId;
        let cost: Vec<f64> = (0..criteria).map(|_| (rng.below(9) + 1) as f64).collect();
        builder.add_edge(from, to, cost).expect("generated edge is valid");
    }
    builder.build().expect("generated graph is non-empty")
}

/// Random graph over `criteria` with integer costs in `low..=high`, which may
/// be negative.
#[allow(dead_code)]
pub fn random_graph_with(
    criteria: Criteria,
    nodes: usize,
    edges: usize,
    (low, high): (i64, i64),
    seed: u64,
) -> Graph {
    let mut rng = Lcg::new(seed);
    let width = criteria.len();
    let span = (high - low + 1) as u64;
    let mut builder = Graph::builder(criteria, nodes);
    for _ in 0..edges {
        let from = rng.below(nodes as u64) as NodeId;
        let to = rng.below(nodes as u64) as NodeId;
        let cost: Vec<f64> = (0..width)
            .map(|_| (low + rng.below(span) as i64) as f64)
            .collect();
        builder.add_edge(from, to, cost).expect("generated edge is valid");
    }
    builder.build().expect("generated graph is non-empty")
}

/// Non-dominated elementary paths from `source` to every node, found by
/// enumerating every elementary path. Each front is sorted in export order
/// and holds each distinct (cost, path) once.
#[allow(dead_code)]
pub fn enumerate_fronts(graph: &Graph, source: NodeId) -> Vec<Vec<ParetoPath>> {
    let criteria = graph.criteria();
    let mut found: Vec<Vec<ParetoPath>> = vec![Vec::new(); graph.node_count()];
    let mut stack = vec![ParetoPath {
        cost: criteria.identity(),
        nodes: vec![source],
    }];

    while let Some(path) = stack.pop() {
        let Some(&node) = path.nodes.last() else {
            continue;
        };
        for edge in graph.edges_from(node) {
            if path.nodes.contains(&edge.target) {
                continue;
            }
            let mut nodes = path.nodes.clone();
            nodes.push(edge.target);
            stack.push(ParetoPath {
                cost: criteria.combine(&path.cost, &edge.cost),
                nodes,
            });
        }
        found[node as usize].push(path);
    }

    found
        .into_iter()
        .map(|candidates| {
            let mut front: Vec<ParetoPath> = candidates
                .iter()
                .filter(|path| {
                    !candidates
                        .iter()
                        .any(|other| criteria.dominates(&other.cost, &path.cost))
                })
                .cloned()
                .collect();
            front.sort_by(|a, b| a.canonical_cmp(b));
            front.dedup();
            front
        })
        .collect()
}

/// Distinct cost vectors of a front, in export order.
#[allow(dead_code)]
pub fn distinct_costs(paths: &[ParetoPath]) -> Vec<CostVector> {
    let mut costs: Vec<CostVector> = paths.iter().map(|path| path.cost.clone()).collect();
    costs.dedup();
    costs
}

/// Single-criterion shortest distances from `source` using component
/// `criterion` of each edge. Costs must be non-negative integers.
#[allow(dead_code)]
pub fn dijkstra(graph: &Graph, source: NodeId, criterion: usize) -> Vec<Option<u64>> {
    let mut distances = vec![None; graph.node_count()];
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0_u64, source)));

    while let Some(Reverse((distance, node))) = heap.pop() {
        if distances[node as usize].is_some() {
            continue;
        }
        distances[node as usize] = Some(distance);
        for edge in graph.edges_from(node) {
            if distances[edge.target as usize].is_none() {
                heap.push(Reverse((distance + edge.cost[criterion] as u64, edge.target)));
            }
        }
    }
    distances
}
