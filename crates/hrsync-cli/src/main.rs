//! # hrsync CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hrsync_cli::employees::{run_employees, EmployeesArgs};
use hrsync_cli::map::{run_map, MapArgs};
use hrsync_cli::sync::{run_sync, SyncArgs};

/// Reconcile HR employees with chat accounts.
///
/// Each run is a point-in-time batch: it links records that share an e-mail,
/// creates missing counterparts and reports every record's outcome.
#[derive(Parser, Debug)]
#[command(name = "hrsync", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to the run policy YAML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one sync direction and print the result.
    Sync(SyncArgs),

    /// List chat accounts matched to HR employees by e-mail.
    Map(MapArgs),

    /// Employee directory queries.
    Employees(EmployeesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "hrsync starting");

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Sync(args) => run_sync(args, config),
        Commands::Map(args) => run_map(args, config),
        Commands::Employees(args) => run_employees(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
