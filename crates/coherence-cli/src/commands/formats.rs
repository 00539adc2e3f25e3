//! Formats command implementation.

use anyhow::Result;
use console::style;

use coherence::Coherence;

use super::common::print_json;

/// Execute the formats command.
///
/// Needs no store.
pub fn execute(json: bool) -> Result<()> {
    let formats = Coherence::in_memory().formats();

    if json {
        return print_json(&formats);
    }

    println!("{}", style("Input formats:").bold());
    println!("  {:<14} detect from content", style("auto").cyan());
    println!("  {:<14} alias of neutral_json", style("json").cyan());
    println!("\n{}", style("Formats:").bold());
    for format in &formats {
        println!(
            "  {:<14} {}",
            style(&format.name).cyan(),
            style(format.gates.join(" ")).dim()
        );
    }
    Ok(())
}
