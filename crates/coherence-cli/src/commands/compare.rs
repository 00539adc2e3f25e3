//! Compare command implementation.

use anyhow::Result;
use console::style;

use coherence::Config;

use super::common::{open, print_json};

/// Execute the compare command.
pub fn execute(config: &Config, ids: &[i64], json: bool) -> Result<()> {
    let coherence = open(config)?;
    let rows = coherence.compare(ids)?;

    if json {
        return print_json(&rows);
    }

    let best = rows
        .iter()
        .max_by(|a, b| a.metrics.qes.total_cmp(&b.metrics.qes))
        .map(|row| row.summary.id);

    println!(
        "{:>6}  {:>6}  {:>6}  {:>6}  {:>10}  {:>10}  {:>10}  {:>8}",
        style("ID").bold(),
        style("QUBITS").bold(),
        style("GATES").bold(),
        style("DEPTH").bold(),
        style("FIDELITY").bold(),
        style("ENERGY").bold(),
        style("E1").bold(),
        style("QES").bold()
    );
    for row in &rows {
        let m = &row.metrics;
        let qes = format!("{:>8.4}", m.qes);
        let qes = if Some(row.summary.id) == best {
            style(qes).green().bold()
        } else {
            style(qes)
        };
        println!(
            "{:>6}  {:>6}  {:>6}  {:>6}  {:>10.6}  {:>10.3}  {:>10.6}  {}",
            row.summary.id, m.num_qubits, m.num_gates, m.depth, m.fidelity, m.energy, m.e1, qes
        );
    }
    Ok(())
}
