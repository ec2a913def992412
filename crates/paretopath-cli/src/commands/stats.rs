use std::path::Path;

use anyhow::{Context, Result};

use paretopath_cli::output::GraphStats;
use paretopath_lib::load_graph_file;

pub fn handle_stats(input: &Path, json: bool) -> Result<()> {
    let graph = load_graph_file(input)
        .with_context(|| format!("failed to load graph from {}", input.display()))?;
    let stats = GraphStats::from_graph(&graph);

    if json {
        let rendered =
            serde_json::to_string_pretty(&stats).context("failed to serialise graph stats")?;
        println!("{rendered}");
    } else {
        print!("{}", stats.render());
    }
    Ok(())
}
