mod common;

use paretopath_lib::{
    dominates, load_graph_file, load_graph_str, OptimizerConfig, PathOptimizer, SearchConfig,
    SearchStrategy,
};

use common::{dijkstra, fixture_path, random_graph};

fn optimize(optimizer: &PathOptimizer) {
    let summary = optimizer.optimize_all().expect("run succeeds");
    assert!(summary.is_complete(), "failed sources: {:?}", summary.failed);
}

#[test]
fn three_node_scenario_keeps_both_tradeoffs() {
    let graph = load_graph_file(&fixture_path("scenario.txt")).expect("fixture loads");
    let optimizer = PathOptimizer::new(graph, OptimizerConfig::default()).expect("optimizer");
    optimize(&optimizer);

    let paths = optimizer.table().read(0, 2);
    let found: Vec<_> = paths
        .iter()
        .map(|path| (path.cost.to_vec(), path.nodes.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            (vec![2.0, 6.0], vec![0, 1, 2]),
            (vec![4.0, 1.0], vec![0, 2]),
        ]
    );
    assert!(optimizer.table().read(2, 0).is_empty());
}

#[test]
fn single_node_graph_has_only_the_zero_label() {
    let graph = load_graph_str("1\n").expect("single node");
    let optimizer = PathOptimizer::new(graph, OptimizerConfig::default()).expect("optimizer");
    optimize(&optimizer);

    let pairs: Vec<_> = optimizer
        .table()
        .all_pairs()
        .map(|entry| (entry.source, entry.destination, entry.front.paths()))
        .collect();
    assert_eq!(pairs.len(), 1);
    let (source, destination, paths) = &pairs[0];
    assert_eq!((*source, *destination), (0, 0));
    assert_eq!(paths.len(), 1);
    assert!(paths[0].cost.is_empty());
    assert_eq!(paths[0].nodes, vec![0]);
}

#[test]
fn zero_cost_cycle_terminates_with_anomaly() {
    let graph = load_graph_file(&fixture_path("zero_cycle.txt")).expect("fixture loads");
    let optimizer = PathOptimizer::new(graph, OptimizerConfig::default()).expect("optimizer");
    let summary = optimizer.optimize_all().expect("run succeeds");

    assert_eq!(summary.anomalies.degenerate_cycles, 2);
    assert_eq!(optimizer.table().read(0, 1).len(), 1);
    assert_eq!(optimizer.table().read(1, 0)[0].nodes, vec![1, 0]);
}

#[test]
fn fronts_are_pairwise_non_dominated() {
    for seed in 0..4 {
        let graph = random_graph(12, 40, 3, seed);
        let optimizer = PathOptimizer::new(graph, OptimizerConfig::default()).expect("optimizer");
        optimize(&optimizer);

        for entry in optimizer.table().all_pairs() {
            let paths = entry.front.paths();
            for (i, a) in paths.iter().enumerate() {
                for (j, b) in paths.iter().enumerate() {
                    assert!(
                        i == j || !dominates(&a.cost, &b.cost),
                        "seed {seed}: {:?} dominates {:?} for pair {}->{}",
                        a,
                        b,
                        entry.source,
                        entry.destination
                    );
                }
            }
        }
    }
}

#[test]
fn paths_are_elementary_and_consistent_with_edges() {
    let graph = random_graph(10, 35, 2, 7);
    let optimizer =
        PathOptimizer::new(graph.clone(), OptimizerConfig::default()).expect("optimizer");
    optimize(&optimizer);

    for entry in optimizer.table().all_pairs() {
        for path in entry.front.paths() {
            let mut seen = path.nodes.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), path.nodes.len(), "path revisits a node: {path:?}");

            assert_eq!(path.nodes.first(), Some(&entry.source));
            assert_eq!(path.nodes.last(), Some(&entry.destination));
            for hop in path.nodes.windows(2) {
                assert!(
                    graph.edges_from(hop[0]).iter().any(|edge| edge.target == hop[1]),
                    "no edge {} -> {}",
                    hop[0],
                    hop[1]
                );
            }
        }
    }
}

#[test]
fn every_front_contains_each_single_criterion_optimum() {
    let graph = random_graph(14, 50, 3, 11);
    let optimizer =
        PathOptimizer::new(graph.clone(), OptimizerConfig::default()).expect("optimizer");
    optimize(&optimizer);

    for source in graph.nodes() {
        for criterion in 0..3 {
            let distances = dijkstra(&graph, source, criterion);
            for destination in graph.nodes() {
                let paths = optimizer.table().read(source, destination);
                match distances[destination as usize] {
                    None => assert!(paths.is_empty()),
                    Some(best) => {
                        let front_best = paths
                            .iter()
                            .map(|path| path.cost[criterion] as u64)
                            .min()
                            .expect("reachable pair has a front");
                        assert_eq!(
                            front_best, best,
                            "criterion {criterion} for {source}->{destination}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn reoptimizing_after_reset_is_idempotent() {
    let graph = random_graph(10, 30, 2, 3);
    let mut optimizer = PathOptimizer::new(graph, OptimizerConfig::default()).expect("optimizer");
    optimize(&optimizer);
    let first = optimizer.table().snapshot();

    optimizer.reset();
    assert!(optimizer.table().read(0, 0).is_empty());
    optimize(&optimizer);
    assert_eq!(optimizer.table().snapshot(), first);
}

#[test]
fn parallel_run_agrees_with_sequential() {
    let graph = random_graph(16, 60, 2, 21);
    let sequential =
        PathOptimizer::new(graph.clone(), OptimizerConfig::default()).expect("optimizer");
    optimize(&sequential);

    for jobs in [0, 4] {
        let config = OptimizerConfig {
            jobs,
            ..OptimizerConfig::default()
        };
        let parallel = PathOptimizer::new(graph.clone(), config).expect("optimizer");
        optimize(&parallel);
        assert_eq!(parallel.table().snapshot(), sequential.table().snapshot(), "jobs {jobs}");
    }
}

#[test]
fn label_setting_finds_the_same_paths_when_ties_are_kept() {
    let graph = random_graph(16, 60, 2, 33);
    let search = SearchConfig {
        keep_equal_cost_paths: true,
        ..SearchConfig::default()
    };
    let correcting = PathOptimizer::new(
        graph.clone(),
        OptimizerConfig {
            search: search.clone(),
            ..OptimizerConfig::default()
        },
    )
    .expect("optimizer");
    optimize(&correcting);

    let setting = PathOptimizer::new(
        graph,
        OptimizerConfig {
            search: SearchConfig {
                strategy: SearchStrategy::LabelSetting,
                ..search
            },
            ..OptimizerConfig::default()
        },
    )
    .expect("optimizer");
    assert_eq!(setting.strategy(), SearchStrategy::LabelSetting);
    optimize(&setting);

    assert_eq!(setting.table().snapshot(), correcting.table().snapshot());
}

#[test]
fn named_network_respects_criterion_directions() {
    let graph = load_graph_file(&fixture_path("transit.txt")).expect("fixture loads");
    assert_eq!(graph.node_name(3), Some("station"));
    let optimizer =
        PathOptimizer::new(graph.clone(), OptimizerConfig::default()).expect("optimizer");
    optimize(&optimizer);

    let criteria = graph.criteria();
    for entry in optimizer.table().all_pairs() {
        let paths = entry.front.paths();
        for a in &paths {
            for b in &paths {
                assert!(!criteria.dominates(&a.cost, &b.cost));
            }
        }
    }

    // depot -> station: via market (time 9, wide) or via harbour (time 6, narrow).
    let paths = optimizer.table().read(0, 3);
    let routes: Vec<_> = paths.iter().map(|path| path.nodes.clone()).collect();
    assert!(routes.contains(&vec![0, 2, 3]));
    assert!(routes.contains(&vec![0, 1, 3]));
    for path in &paths {
        assert_eq!(path.cost[1], path.hops() as f64 * 0.5 + fare_sum(&graph, &path.nodes));
    }
}

fn fare_sum(graph: &paretopath_lib::Graph, nodes: &[paretopath_lib::NodeId]) -> f64 {
    nodes
        .windows(2)
        .map(|hop| {
            graph
                .edges_from(hop[0])
                .iter()
                .find(|edge| edge.target == hop[1])
                .map(|edge| edge.cost[1])
                .expect("edge exists")
        })
        .sum()
}
