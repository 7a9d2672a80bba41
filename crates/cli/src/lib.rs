//! # Codemap CLI
//!
//! The `codemap` binary: map a Python workspace into a call graph with
//! per-callable summaries and stored embeddings, decompose and solve a
//! task, or search previously stored summaries.

mod commands;
mod settings;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use codemap_oracle::{create_oracle, OracleKind};
use codemap_solver::SolverConfig;
use settings::Settings;
use std::io;
use std::path::PathBuf;

pub(crate) fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "codemap")]
#[command(about = "Call-graph mapping, code summarization and task solving", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Oracle implementation (openai, canned); overrides CODEMAP_ORACLE
    #[arg(long, global = true)]
    oracle: Option<OracleKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the call graph of a workspace, summarize every node and
    /// optionally store summary embeddings
    Map(MapArgs),

    /// Decompose a task into a bounded tree and solve it bottom-up
    Solve(SolveArgs),

    /// Nearest-neighbor lookup over stored summaries
    Search(SearchArgs),
}

#[derive(Args)]
struct MapArgs {
    /// Workspace root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Write summary-plus-vector records (JSON) to this file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Print graph and summaries as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SolveArgs {
    /// Task text
    task: String,

    /// Maximum tree depth, counting the root
    #[arg(long)]
    max_depth: Option<usize>,

    /// Always split tasks without consulting the oracle
    #[arg(long)]
    force_breakdown: bool,

    /// Print the resolved tree as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// Query text
    query: String,

    /// Records file written by `map --store`
    #[arg(long)]
    store: PathBuf,

    /// Number of results
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let settings = Settings::from_env();
    let kind = cli.oracle.unwrap_or(settings.oracle);
    let oracle = create_oracle(kind, settings.oracle_config())?;
    log::debug!("using {kind} oracle");

    match cli.command {
        Commands::Map(args) => {
            commands::run_map(&args.root, args.store.as_deref(), args.json, oracle.as_ref())
        }
        Commands::Solve(args) => {
            let config = SolverConfig {
                max_depth: args.max_depth.unwrap_or(settings.max_tree_depth),
                force_breakdown: args.force_breakdown || settings.force_breakdown,
            };
            commands::run_solve(&args.task, config, args.json, oracle.as_ref())
        }
        Commands::Search(args) => {
            commands::run_search(&args.query, &args.store, args.limit, oracle.as_ref())
        }
    }
}
