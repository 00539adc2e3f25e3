//! Shared helpers for CLI commands.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use coherence::{Alert, Coherence, Config, MetricsResult};

/// Read an input file, or stdin for `-`.
pub fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }
    std::fs::read(input).with_context(|| format!("Failed to read file: {input}"))
}

/// Open the configured store.
pub fn open(config: &Config) -> Result<Coherence> {
    Coherence::open(config).with_context(|| {
        format!(
            "Failed to open result store at {}",
            config.storage.resolved_path().display()
        )
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}

pub fn timestamp(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print metrics as an indented table.
pub fn print_metrics(metrics: &MetricsResult) {
    println!("  Qubits:     {}", metrics.num_qubits);
    println!("  Gates:      {}", metrics.num_gates);
    println!("  Depth:      {}", metrics.depth);
    println!("  Two-qubit:  {}", metrics.two_qubit_gates);
    println!("  Fidelity:   {}", style(format!("{:.6}", metrics.fidelity)).yellow());
    println!("  Energy:     {:.3}", metrics.energy);
    println!("  E1:         {:.6}", metrics.e1);
    println!("  QES:        {}", style(format!("{:.4}", metrics.qes)).yellow().bold());

    if !metrics.gate_counts.is_empty() {
        println!("\n  Gate counts:");
        for (name, count) in &metrics.gate_counts {
            println!("    {:<8} {:>6}", style(name).cyan(), count);
        }
    }
}

pub fn print_alerts(alerts: &[Alert]) {
    println!("\n  Alerts:");
    for alert in alerts {
        if alert.is_issue() {
            println!("    {} {}", style("!").red().bold(), alert);
        } else {
            println!("    {} {}", style("✓").green().bold(), alert);
        }
    }
}
