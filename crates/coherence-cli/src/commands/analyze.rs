//! Analyze command implementation.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use coherence::{AnalyzeOptions, Config, MetricsConfig};

use super::common::{open, print_alerts, print_json, print_metrics, read_input};

/// Execute the analyze command.
///
/// `profile` is a metrics YAML file; keys it omits keep their defaults.
pub fn execute(
    config: &Config,
    input: &str,
    from: &str,
    notes: Option<&str>,
    profile: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut options = AnalyzeOptions::default();
    if let Some(path) = profile {
        let metrics = MetricsConfig::from_file(path)
            .with_context(|| format!("Failed to load metrics profile {}", path.display()))?;
        options = options.with_metrics(metrics);
    }
    if let Some(notes) = notes {
        options = options.with_notes(notes);
    }

    let raw = read_input(input)?;
    let coherence = open(config)?;
    let analysis = coherence.analyze_with(&raw, from, &options)?;

    if json {
        return print_json(&analysis);
    }

    let result = &analysis.result;
    println!(
        "{} Analyzed {} ({})",
        style("✓").green().bold(),
        style(input).green(),
        style(&analysis.source_format).cyan()
    );
    println!(
        "  Result #{}  hash {}\n",
        style(result.id).bold(),
        style(result.content_hash.short()).dim()
    );
    if let Some(notes) = &result.notes {
        println!("  Notes: {notes}\n");
    }
    print_metrics(&result.metrics);
    print_alerts(&analysis.alerts);
    Ok(())
}
