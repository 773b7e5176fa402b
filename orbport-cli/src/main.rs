//! orbport: copy orbs from one registry into another.
//!
//! # Usage
//!
//! ```text
//! orbport import <REFERENCE>... [--no-prompt] [--dry-run] [--host URL] [--token TOKEN] [--source-host URL] [--source-endpoint PATH]
//! orbport setup --host URL --token TOKEN [--endpoint PATH]
//! ```
//!
//! A reference is either a namespace (`acme`, every orb's latest version) or
//! an orb version (`acme/build-tools@1.2.0`; the version defaults to
//! `volatile`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{import::ImportArgs, setup::SetupArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orbport",
    version,
    about = "Import orbs from a public registry into a private one",
    long_about = None,
)]
struct Cli {
    /// Log registry calls to stderr (same as RUST_LOG=debug).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import namespaces and orb versions into the destination registry.
    Import(ImportArgs),

    /// Write destination host and token to ~/.orbport/cli.yml.
    Setup(SetupArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Import(args) => args.run(),
        Commands::Setup(args) => args.run(),
    }
}

/// Logs go to stderr; stdout carries only the plan and summary.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
