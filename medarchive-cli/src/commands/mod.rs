//! Subcommand implementations.

pub mod check;
pub mod complete;
pub mod forms;
pub mod update;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use medarchive_core::Settings;
use medarchive_renderer::ExternalRenderer;
use medarchive_sync::{run, Credentials, HttpTransport, RunContext, RunMode, RunSummary, SyncError};

/// Forms service credentials.
#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Forms API access token.
    #[arg(long, env = "MEDARCHIVE_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Encryption password of the form, if it is encrypted.
    #[arg(long, env = "MEDARCHIVE_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials {
            token: args.token,
            passphrase: args.passphrase,
        }
    }
}

/// Flags shared by `complete` and `update`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// LaTeX template with `[[field]]` placeholders.
    #[arg(long, default_value = "template.tex", value_name = "FILE")]
    pub template: PathBuf,
}

/// Run `mode` against `dir` and print the outcome.
pub(crate) fn execute(dir: &Path, mode: RunMode, args: RunArgs, settings: Settings) -> Result<()> {
    let transport = HttpTransport::from_settings(&settings);
    let renderer = ExternalRenderer::from_settings(&settings.renderer);
    let ctx = RunContext::load(dir, &args.template, settings).map_err(SyncError::from)?;
    let credentials = Credentials::from(args.credentials);
    tracing::debug!(dir = %dir.display(), renderer = renderer.program(), "starting run");

    let summary = run(&ctx, mode, &transport, &renderer, &credentials)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} '{}': {} new, {} already archived, {} artifacts verified",
        "✓".green(),
        summary.program,
        summary.generated.len(),
        summary.already_processed,
        summary.verified,
    );
    println!("  Index: {}", summary.manifest.display());
    println!("Done! Enjoy!");
}
