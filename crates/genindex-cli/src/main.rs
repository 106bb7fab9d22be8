//! # genindex CLI entry point
//!
//! Parses command-line arguments, loads the repository configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use genindex_cli::config::Config;
use genindex_cli::fmt::{run_fmt, FmtArgs};
use genindex_cli::list::{run_list, ListArgs};
use genindex_cli::validate::{run_validate, ValidateArgs};

/// Generator catalog toolkit.
///
/// Validates the entity and migration generator indexes against the
/// published JSON Schema, lists catalog entries, and keeps the index files
/// in canonical layout.
#[derive(Parser, Debug)]
#[command(name = "genindex", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository root. Defaults to the nearest directory holding the
    /// catalog schema or an index file.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the generator indexes against the schema.
    Validate(ValidateArgs),

    /// List catalog entries, optionally filtered by ORM or database.
    List(ListArgs),

    /// Rewrite the indexes in canonical layout, or check that they are.
    Fmt(FmtArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level. Reports own stdout.
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

    let repo_root = cli.root.clone().unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        genindex_cli::find_repo_root(&cwd).unwrap_or_else(|| {
            tracing::warn!("Could not locate repository root; using current directory");
            cwd
        })
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let config = match Config::load(cli.config.as_deref(), &repo_root) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &repo_root, &config),
        Commands::List(args) => run_list(&args, &repo_root, &config),
        Commands::Fmt(args) => run_fmt(&args, &repo_root, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
