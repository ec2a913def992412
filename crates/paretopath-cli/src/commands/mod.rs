// Handlers for the CLI subcommands; main.rs only parses and dispatches.

pub mod check;
pub mod optimize;
pub mod stats;
