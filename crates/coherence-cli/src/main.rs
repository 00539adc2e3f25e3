//! Coherence Command-Line Interface
//!
//! Convert circuits between QASM, neutral JSON and SDK vocabularies, analyze
//! them, and browse the local result store.
//!
//! ```text
//! coherence convert bell.qasm --to cirq
//! coherence analyze circuit.json
//! coherence results --page 0
//! coherence compare 1 2 3
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use coherence::{Config, LoggingConfig, logging};

mod commands;

use commands::{analyze, clear, compare, convert, formats, results, show, stats};

/// Coherence - quantum circuit conversion, metrics and result store
#[derive(Parser)]
#[command(name = "coherence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "COHERENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Result database file (overrides the configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a circuit to another format without storing it
    Convert {
        /// Input file, or - for stdin
        input: String,

        /// Input format (auto, qasm, json, or a vocabulary name)
        #[arg(short, long, default_value = "auto")]
        from: String,

        /// Output format (qasm, json, or a vocabulary name)
        #[arg(short, long, default_value = "qiskit")]
        to: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute metrics for a circuit and store the result
    Analyze {
        /// Input file, or - for stdin
        input: String,

        /// Input format (auto, qasm, json, or a vocabulary name)
        #[arg(short, long, default_value = "auto")]
        from: String,

        /// Notes stored with a new result
        #[arg(long)]
        notes: Option<String>,

        /// Metrics YAML used for this run instead of the configured model
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// List stored results, oldest first
    Results {
        /// Page number, starting at 0
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Results per page (1-500)
        #[arg(short = 'n', long, default_value = "50")]
        page_size: usize,
    },

    /// Show one stored result
    Show {
        /// Result id
        id: i64,

        /// Also print the circuit in this format
        #[arg(long)]
        circuit: Option<String>,
    },

    /// Compare 2 to 10 stored results
    Compare {
        /// Result ids
        #[arg(required = true, num_args = 2..=10)]
        ids: Vec<i64>,
    },

    /// Show result store statistics
    Stats,

    /// Delete every stored result
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List supported formats and their gates
    Formats,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage.path = Some(db);
    }

    let level = logging::level_for_verbosity(&config.logging.level, cli.verbose).to_string();
    logging::init(&LoggingConfig {
        level,
        format: config.logging.format.clone(),
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    tracing::debug!(
        backend = ?config.storage.backend,
        path = ?config.storage.path,
        "Configuration loaded"
    );

    let json = cli.json;
    match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            output,
        } => convert::execute(&input, &from, &to, output.as_deref(), json),

        Commands::Analyze {
            input,
            from,
            notes,
            profile,
        } => analyze::execute(
            &config,
            &input,
            &from,
            notes.as_deref(),
            profile.as_deref(),
            json,
        ),

        Commands::Results { page, page_size } => {
            results::execute(&config, page, page_size, json)
        }

        Commands::Show { id, circuit } => show::execute(&config, id, circuit.as_deref(), json),

        Commands::Compare { ids } => compare::execute(&config, &ids, json),

        Commands::Stats => stats::execute(&config, json),

        Commands::Clear { yes } => clear::execute(&config, yes),

        Commands::Formats => formats::execute(json),
    }
}
