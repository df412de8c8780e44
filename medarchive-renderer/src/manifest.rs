//! Archive manifest rendering, the human-readable `000 - index.txt`.
//!
//! ```text
//! Splash 2014
//! MIT Educational Studies Program
//! esp@mit.edu  |  (617) 253-4882
//! Last Updated: Thu Oct 16 09:05:03 2026
//!
//! 7 - Alan Turing - alan (v1)
//! 12 - Ada Lovelace - ada (v1)
//! 12 - Ada Lovelace - ada (v2)
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;
use tera::Tera;

use medarchive_core::VersionLedger;

use crate::error::RenderError;

const MANIFEST_TEMPLATE: &str = "manifest.txt";

const TPLS: &[(&str, &str)] = &[(MANIFEST_TEMPLATE, include_str!("templates/manifest.txt.tera"))];

/// `asctime`-style timestamp used on the "Last Updated" line.
pub const UPDATED_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Serializable manifest payload.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestContext {
    pub program: String,
    pub organization: String,
    pub contact: String,
    pub updated: String,
    /// Artifact base names, submitter keys ascending, versions ascending.
    pub entries: Vec<String>,
}

impl ManifestContext {
    /// Build the payload from a ledger. For each key, versions are listed from 1
    /// up to (not including) the first missing version.
    pub fn from_ledger(
        program: &str,
        organization: &str,
        contact: &str,
        updated: DateTime<Local>,
        ledger: &VersionLedger,
    ) -> Self {
        ManifestContext {
            program: program.to_string(),
            organization: organization.to_string(),
            contact: contact.to_string(),
            updated: updated.format(UPDATED_FORMAT).to_string(),
            entries: ledger
                .artifacts()
                .into_iter()
                .map(|(_, _, name)| name.to_string())
                .collect(),
        }
    }
}

/// Tera-backed manifest renderer using the embedded template.
pub struct ManifestRenderer {
    tera: Tera,
}

impl ManifestRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TPLS.iter().copied())?;
        Ok(ManifestRenderer { tera })
    }

    pub fn render(&self, ctx: &ManifestContext) -> Result<String, RenderError> {
        let tera_ctx = tera::Context::from_serialize(ctx)?;
        Ok(self.tera.render(MANIFEST_TEMPLATE, &tera_ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use medarchive_core::{SubmitterKey, VersionSlot};

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2014, 3, 4, 9, 5, 3).single().expect("unambiguous time")
    }

    fn ledger() -> VersionLedger {
        let mut ledger = VersionLedger::new();
        ledger.commit(ledger.next_slot(SubmitterKey(12)), "12 - Ada Lovelace - ada (v1)");
        ledger.commit(ledger.next_slot(SubmitterKey(7)), "7 - Alan Turing - alan (v1)");
        ledger.commit(ledger.next_slot(SubmitterKey(12)), "12 - Ada Lovelace - ada (v2)");
        ledger
    }

    #[test]
    fn manifest_layout() {
        let ctx = ManifestContext::from_ledger("Splash 2014", "Org", "Contact", fixed_time(), &ledger());
        let text = ManifestRenderer::new().unwrap().render(&ctx).unwrap();
        assert_eq!(
            text,
            "Splash 2014\nOrg\nContact\nLast Updated: Tue Mar  4 09:05:03 2014\n\n\
             7 - Alan Turing - alan (v1)\n\
             12 - Ada Lovelace - ada (v1)\n\
             12 - Ada Lovelace - ada (v2)\n"
        );
    }

    #[test]
    fn listing_stops_at_first_missing_version() {
        let mut ledger = VersionLedger::new();
        let key = SubmitterKey(5);
        ledger.commit(VersionSlot { key, version: 1 }, "five v1");
        ledger.commit(VersionSlot { key, version: 3 }, "five v3");
        let ctx = ManifestContext::from_ledger("P", "O", "C", fixed_time(), &ledger);
        assert_eq!(ctx.entries, vec!["five v1".to_string()]);
    }

    #[test]
    fn names_are_not_html_escaped() {
        let mut ledger = VersionLedger::new();
        ledger.commit(ledger.next_slot(SubmitterKey(1)), "1 - A & B - ab (v1)");
        let ctx = ManifestContext::from_ledger("P", "O", "C", fixed_time(), &ledger);
        let text = ManifestRenderer::new().unwrap().render(&ctx).unwrap();
        assert!(text.contains("1 - A & B - ab (v1)"));
    }
}
