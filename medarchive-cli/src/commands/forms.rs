//! `medarchive forms`: list the forms a token can see.

use anyhow::Result;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use medarchive_core::Settings;
use medarchive_sync::{FormsApi, HttpTransport, SyncError};

use super::CredentialArgs;

/// List forms available to the access token, `Medical` folder first.
#[derive(Args, Debug)]
pub struct FormsArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "submissions")]
    submissions: u64,
    #[tabled(rename = "program")]
    program: String,
}

impl FormsArgs {
    pub fn run(self, settings: Settings) -> Result<()> {
        let transport = HttpTransport::from_settings(&settings);
        let api = FormsApi::new(
            &transport,
            &self.credentials.token,
            self.credentials.passphrase.as_deref(),
        );
        let forms = api.list_forms().map_err(SyncError::from)?;

        if forms.is_empty() {
            println!("No forms visible to this token.");
            return Ok(());
        }
        let rows: Vec<FormRow> = forms
            .into_iter()
            .map(|form| FormRow {
                program: form.program_label(),
                id: form.id,
                name: form.name,
                submissions: form.submissions,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
