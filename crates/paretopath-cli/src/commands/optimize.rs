//! `paretopath optimize`: load, optimize every source, export.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use paretopath_cli::output::render_summary;
use paretopath_lib::{
    load_graph_file, ExportFormat, OptimizerConfig, PathOptimizer, SearchStrategy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// FIFO label-correcting search; exact for every criterion kind.
    Correcting,
    /// Lexicographic label-setting search for non-negative additive criteria.
    Setting,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Correcting => SearchStrategy::LabelCorrecting,
            StrategyArg::Setting => SearchStrategy::LabelSetting,
        }
    }
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Graph description in plain or sectioned format.
    pub input: PathBuf,

    /// Write the export here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// JSON file with optimizer settings; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads (0 = one per core).
    #[arg(long, short)]
    pub jobs: Option<usize>,

    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Label expansions allowed per source before it is abandoned.
    #[arg(long)]
    pub max_expansions: Option<usize>,

    /// Drop the expansion cap entirely.
    #[arg(long, conflicts_with = "max_expansions")]
    pub unlimited: bool,

    /// Discard labels with any cost component beyond this magnitude.
    #[arg(long)]
    pub cost_bound: Option<f64>,

    /// Keep distinct paths whose costs tie exactly.
    #[arg(long)]
    pub keep_equal_cost_paths: bool,
}

impl OptimizeArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => OptimizerConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => OptimizerConfig::default(),
        };

        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(strategy) = self.strategy {
            config.search.strategy = strategy.into();
        }
        if let Some(limit) = self.max_expansions {
            config.search.max_expansions = Some(limit);
        }
        if self.unlimited {
            config.search.max_expansions = None;
        }
        if let Some(bound) = self.cost_bound {
            config.search.cost_bound = Some(bound);
        }
        if self.keep_equal_cost_paths {
            config.search.keep_equal_cost_paths = true;
        }
        Ok(config)
    }
}

pub fn handle_optimize(args: &OptimizeArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let graph = load_graph_file(&args.input)
        .with_context(|| format!("failed to load graph from {}", args.input.display()))?;
    let optimizer =
        PathOptimizer::new(graph, config).context("invalid optimizer configuration")?;

    let summary = optimizer.optimize_all().context("optimization aborted")?;

    let format = ExportFormat::from(args.format);
    let export = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            optimizer.export(BufWriter::new(file), format)
        }
        None => optimizer.export(BufWriter::new(io::stdout().lock()), format),
    }
    .context("failed to write export")?;

    eprint!("{}", render_summary(&summary, &export));

    if !summary.is_complete() {
        bail!(
            "{} of {} sources could not be optimized",
            summary.failed.len(),
            summary.sources
        );
    }
    Ok(())
}
