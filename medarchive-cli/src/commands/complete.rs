//! `medarchive complete --dir <DIR> --form <FORM_ID> [--program <LABEL>]`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use medarchive_core::Settings;
use medarchive_sync::RunMode;

use super::RunArgs;

/// Download a complete archive into a new, empty directory.
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Existing, empty directory to hold the archive. Should be encrypted and
    /// excluded from backups.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Identifier of the form to download (see `medarchive forms`).
    #[arg(long, value_name = "FORM_ID")]
    pub form: String,

    /// Program label for the index. Defaults to the form name minus its last word.
    #[arg(long, value_name = "LABEL")]
    pub program: Option<String>,

    #[command(flatten)]
    pub common: RunArgs,
}

impl CompleteArgs {
    pub fn run(self, settings: Settings) -> Result<()> {
        let mode = RunMode::Complete {
            form_id: self.form,
            program: self.program,
        };
        super::execute(&self.dir, mode, self.common, settings)
    }
}
