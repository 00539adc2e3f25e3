//! Stats command implementation.

use anyhow::Result;
use console::style;

use coherence::Config;

use super::common::{open, print_json};

/// Execute the stats command.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let coherence = open(config)?;
    let stats = coherence.stats()?;

    if json {
        return print_json(&stats);
    }

    let avg = |value: Option<f64>, precision: usize| {
        value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
    };
    println!("{} Result store", style("→").cyan().bold());
    println!(
        "  Location:       {}",
        style(config.storage.resolved_path().display()).dim()
    );
    println!("  Records:        {}", style(stats.total_records).bold());
    println!("  Last 24 hours:  {}", stats.recent_24h);
    println!("  Average QES:    {}", avg(stats.average_qes, 4));
    println!("  Avg fidelity:   {}", avg(stats.average_fidelity, 6));
    println!("  Average depth:  {}", avg(stats.average_depth, 2));
    println!(
        "  Max depth:      {}",
        stats
            .max_depth
            .map_or_else(|| "-".to_string(), |d| d.to_string())
    );
    if !stats.format_distribution.is_empty() {
        println!("  Formats:");
        for (format, count) in &stats.format_distribution {
            println!("    {:<14}{count}", format!("{format}:"));
        }
    }
    Ok(())
}
