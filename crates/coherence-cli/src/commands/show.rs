//! Show command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use coherence::{Config, Format, Report};

use super::common::{open, print_alerts, print_json, print_metrics, timestamp};

#[derive(Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    report: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    rendered: Option<String>,
}

/// Execute the show command.
pub fn execute(config: &Config, id: i64, circuit_format: Option<&str>, json: bool) -> Result<()> {
    let coherence = open(config)?;
    let report = coherence.result(id)?;
    let rendered = circuit_format
        .map(|name| {
            let target = Format::target(name, coherence.vocabularies())?;
            coherence.render(&report.result.circuit, &target)
        })
        .transpose()?;

    if json {
        return print_json(&ShowOutput {
            report: &report,
            rendered,
        });
    }

    let result = &report.result;
    println!("{} Result #{}", style("→").cyan().bold(), style(result.id).bold());
    println!("  Hash:       {}", style(&result.content_hash).dim());
    println!("  Format:     {}", style(&result.source_format).cyan());
    if let Some(notes) = &result.notes {
        println!("  Notes:      {notes}");
    }
    println!("  Created:    {}", timestamp(&result.created_at));
    print_metrics(&result.metrics);
    print_alerts(&report.alerts);

    if let Some(text) = rendered {
        println!();
        print!("{text}");
    }
    Ok(())
}
