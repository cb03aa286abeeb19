//! Algotrace CLI - inspect and run instrumented algorithms
//!
//! # Commands
//!
//! - `algotrace list` - Catalog of built-in algorithms
//! - `algotrace show <id>` - One descriptor as JSON
//! - `algotrace run <id>` - Drain a run and print its events as JSON lines
//!
//! # Usage
//!
//! ```bash
//! algotrace list --category sorting
//! algotrace run quick-sort --numbers 5,3,8,1 --param pivot=middle
//! algotrace run rabin-karp --pair abracadabra abra --param modulus=7
//! algotrace run n-queens --size 6 --limit 500 --pretty
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=algotrace=trace` to see every event as
//! it is produced.

mod catalog;
mod run;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Algotrace CLI - inspect and run instrumented algorithms
#[derive(Parser)]
#[command(name = "algotrace")]
#[command(about = "Run instrumented algorithms and export their event timelines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered algorithms
    List(catalog::ListArgs),

    /// Print one algorithm's descriptor as JSON
    Show(catalog::ShowArgs),

    /// Run an algorithm and print its events as JSON lines
    Run(run::RunArgs),
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algotrace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List(args) => catalog::list(args),
        Commands::Show(args) => catalog::show(args),
        Commands::Run(args) => run::execute(args),
    }
}
