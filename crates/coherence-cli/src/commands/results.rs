//! Results command implementation.
//!
//! Page through stored results in insertion order.

use anyhow::Result;
use console::style;

use coherence::Config;

use super::common::{open, print_json, timestamp};

/// Execute the results command.
pub fn execute(config: &Config, page: usize, page_size: usize, json: bool) -> Result<()> {
    let coherence = open(config)?;
    let rows = coherence.results(page, page_size)?;

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No results on page {page}.");
        return Ok(());
    }

    println!(
        "{:>6}  {:<12}  {:<12}  {:>6}  {:>6}  {:>6}  {:>8}  {}",
        style("ID").bold(),
        style("HASH").bold(),
        style("FORMAT").bold(),
        style("QUBITS").bold(),
        style("GATES").bold(),
        style("DEPTH").bold(),
        style("QES").bold(),
        style("CREATED").bold()
    );
    for row in &rows {
        println!(
            "{:>6}  {:<12}  {:<12}  {:>6}  {:>6}  {:>6}  {:>8.4}  {}",
            row.id,
            style(row.content_hash.short()).dim(),
            row.source_format,
            row.num_qubits,
            row.num_gates,
            row.depth,
            row.qes,
            timestamp(&row.created_at)
        );
    }
    Ok(())
}
