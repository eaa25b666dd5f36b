//! rlharness CLI - Run reinforcement-learning experiments
//!
//! This CLI provides a unified interface for:
//! - Running experiments of a registered agent in a registered environment
//! - Listing the registered implementations
//! - Summarizing CSV episode logs

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rlharness")]
#[command(version, about = "Pluggable reinforcement-learning experimentation harness", long_about = None)]
struct Cli {
    /// Log filter, e.g. `info` or `rlharness=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an experiment
    Run(Box<rlharness::cli::commands::run::RunArgs>),

    /// List registered agents and environments
    List(rlharness::cli::commands::list::ListArgs),

    /// Summarize a CSV episode log
    Summarize(rlharness::cli::commands::summarize::SummarizeArgs),
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Run(args) => rlharness::cli::commands::run::execute(*args),
        Commands::List(args) => rlharness::cli::commands::list::execute(args),
        Commands::Summarize(args) => rlharness::cli::commands::summarize::execute(args),
    }
}
