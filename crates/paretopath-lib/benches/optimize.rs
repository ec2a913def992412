use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use paretopath_lib::{
    search_from, CancelFlag, Criteria, Graph, NodeId, OptimizerConfig, PathOptimizer,
    SearchConfig, SearchStrategy,
};
use std::hint::black_box;

/// Grid with right and down edges whose two criteria pull in opposite directions.
fn grid(side: usize) -> Graph {
    let mut builder = Graph::builder(Criteria::minimizing(2), side * side);
    let id = |row: usize, col: usize| (row * side + col) as NodeId;
    for row in 0..side {
        for col in 0..side {
            let weight = ((row * 7 + col * 3) % 5 + 1) as f64;
            if col + 1 < side {
                builder
                    .add_edge(id(row, col), id(row, col + 1), [weight, 6.0 - weight])
                    .expect("edge in range");
            }
            if row + 1 < side {
                builder
                    .add_edge(id(row, col), id(row + 1, col), [6.0 - weight, weight])
                    .expect("edge in range");
            }
        }
    }
    builder.build().expect("grid is non-empty")
}

static GRID: Lazy<Graph> = Lazy::new(|| grid(8));

fn benchmark_search(c: &mut Criterion) {
    let graph = &*GRID;

    c.bench_function("label_correcting_single_source", |b| {
        let config = SearchConfig::default();
        b.iter(|| {
            let outcome =
                search_from(graph, 0, &config, &CancelFlag::new()).expect("search succeeds");
            black_box(outcome.stats.labels_kept)
        });
    });

    c.bench_function("label_setting_single_source", |b| {
        let config = SearchConfig {
            strategy: SearchStrategy::LabelSetting,
            ..SearchConfig::default()
        };
        b.iter(|| {
            let outcome =
                search_from(graph, 0, &config, &CancelFlag::new()).expect("search succeeds");
            black_box(outcome.stats.labels_kept)
        });
    });

    c.bench_function("all_pairs_parallel", |b| {
        b.iter(|| {
            let optimizer = PathOptimizer::new(
                graph.clone(),
                OptimizerConfig {
                    jobs: 0,
                    ..OptimizerConfig::default()
                },
            )
            .expect("valid config");
            let summary = optimizer.optimize_all().expect("run succeeds");
            black_box(summary.labels_kept)
        });
    });
}

criterion_group!(benches, benchmark_search);
criterion_main!(benches);
