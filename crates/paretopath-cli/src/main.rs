mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use paretopath_cli::logging::{init_logging, LoggingConfig};

use commands::optimize::OptimizeArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "All-pairs multi-criteria Pareto path optimizer")]
struct Cli {
    /// Only log warnings and errors unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute every Pareto front of a graph and export the path table.
    Optimize(OptimizeArgs),
    /// Load a graph and report its size and criteria.
    Stats {
        /// Graph description in plain or sectioned format.
        input: PathBuf,
        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Parse a text export and report what it contains.
    Check {
        /// File written by `paretopath optimize --format text`.
        export: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.quiet {
        logging = logging.quiet();
    }
    init_logging(&logging);

    match &cli.command {
        Command::Optimize(args) => commands::optimize::handle_optimize(args),
        Command::Stats { input, json } => commands::stats::handle_stats(input, *json),
        Command::Check { export } => commands::check::handle_check(export),
    }
}
