use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use paretopath_cli::output::render_check;
use paretopath_lib::parse_export;

/// Parse an export file and print its pair and path counts.
pub fn handle_check(path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to open export {}", path.display()))?;
    let table = parse_export(BufReader::new(file))
        .with_context(|| format!("failed to parse export {}", path.display()))?;
    print!("{}", render_check(&table));
    Ok(())
}
