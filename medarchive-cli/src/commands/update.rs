//! `medarchive update --dir <DIR>`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use medarchive_core::Settings;
use medarchive_sync::RunMode;

use super::RunArgs;

/// Add new submissions to an existing archive, or resume an interrupted one.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Archive directory containing `state.json`.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub common: RunArgs,
}

impl UpdateArgs {
    pub fn run(self, settings: Settings) -> Result<()> {
        super::execute(&self.dir, RunMode::Update, self.common, settings)
    }
}
