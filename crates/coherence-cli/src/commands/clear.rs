//! Clear command implementation.

use anyhow::Result;
use console::{Term, style};

use coherence::Config;

use super::common::open;

/// Execute the clear command.
pub fn execute(config: &Config, yes: bool) -> Result<()> {
    let coherence = open(config)?;
    let count = coherence.store().count()?;
    if count == 0 {
        println!("Result store is already empty.");
        return Ok(());
    }

    if !yes {
        let term = Term::stderr();
        if !term.is_term() {
            anyhow::bail!("Refusing to delete {count} results without --yes");
        }
        term.write_str(&format!("Delete all {count} stored results? [y/N] "))?;
        let answer = term.read_line()?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = coherence.clear()?;
    println!("{} Deleted {removed} results", style("✓").green().bold());
    Ok(())
}
