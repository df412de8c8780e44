//! medarchive: download form submissions into a versioned document archive.
//!
//! # Usage
//!
//! ```text
//! medarchive complete --dir <DIR> --form <FORM_ID> [--program <LABEL>]
//! medarchive update --dir <DIR>
//! medarchive check --dir <DIR> --username <USER> --password <PASS>
//! medarchive forms
//! ```
//!
//! `--token` / `--passphrase` fall back to `MEDARCHIVE_TOKEN` and
//! `MEDARCHIVE_PASSPHRASE`. `--settings <FILE>` applies to every command.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{check::CheckArgs, complete::CompleteArgs, forms::FormsArgs, update::UpdateArgs};
use medarchive_core::Settings;
use medarchive_sync::{RunFailure, SyncError};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "medarchive",
    version,
    about = "Download form submissions into a resumable, versioned document archive",
    long_about = None,
)]
struct Cli {
    /// Settings file (YAML). Defaults to <config dir>/medarchive/settings.yaml when present.
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download a complete archive into a new, empty directory.
    Complete(CompleteArgs),

    /// Add new submissions to an existing archive.
    Update(UpdateArgs),

    /// Cross-check an archive against website registrations.
    Check(CheckArgs),

    /// List forms available to the access token.
    Forms(FormsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let settings = Settings::discover(cli.settings.as_deref()).map_err(SyncError::from)?;
    match cli.command {
        Commands::Complete(args) => args.run(settings),
        Commands::Update(args) => args.run(settings),
        Commands::Check(args) => args.run(settings),
        Commands::Forms(args) => args.run(settings),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One-line summary, plus the recovery hint when partial progress was saved.
fn report_failure(err: &anyhow::Error) {
    let (kind, message, state_saved) = if let Some(failure) = err.downcast_ref::<RunFailure>() {
        (failure.error.kind(), err.to_string(), failure.state_saved)
    } else if let Some(error) = err.downcast_ref::<SyncError>() {
        (error.kind(), err.to_string(), false)
    } else {
        ("Error", format!("{err:#}"), false)
    };
    eprintln!("{} {message}", format!("Exiting due to {kind}:").red().bold());
    if state_saved {
        eprintln!(
            "{}",
            "State has been saved, but download is incomplete. Recover by running 'medarchive update'"
                .yellow()
        );
    }
}
