//! Convert command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use coherence::Coherence;

use super::common::{print_json, read_input};

/// Execute the convert command.
///
/// Conversion never touches the result store.
pub fn execute(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let raw = read_input(input)?;
    let conversion = Coherence::in_memory().convert(&raw, from, to)?;

    if let Some(path) = output {
        std::fs::write(path, &conversion.output)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        eprintln!(
            "{} Converted {} → {}: {}",
            style("✓").green().bold(),
            style(&conversion.source_format).cyan(),
            style(&conversion.target_format).yellow(),
            style(path.display()).green()
        );
    }

    if json {
        print_json(&conversion)?;
    } else if output.is_none() {
        print!("{}", conversion.output);
    }
    Ok(())
}
