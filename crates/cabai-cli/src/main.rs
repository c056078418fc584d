//! # cabai CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cabai_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use cabai_cli::check::{run_check, CheckArgs};
use cabai_cli::verify::{run_verify, VerifyArgs};

/// Cabai Trace CLI
///
/// Verifies chili product identifiers against traceability records and
/// checks identifier format offline.
#[derive(Parser, Debug)]
#[command(name = "cabai", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a product identifier against traceability records.
    Verify(VerifyArgs),

    /// Check identifier format without looking anything up.
    Check(CheckArgs),

    /// Print the canonical form of an identifier.
    Canonicalize(CanonicalizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Verify(args) => run_verify(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Canonicalize(args) => run_canonicalize(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
