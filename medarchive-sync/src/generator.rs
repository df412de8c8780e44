//! Turns one fetched submission into a source document, a rendered artifact
//! and a ledger entry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use medarchive_core::{
    FieldMap, ProcessedSet, ResolveError, Submission, SubmitterKey, VersionLedger,
};
use medarchive_renderer::{
    artifact_base_name, format_long_date, identity_line, DocumentRenderer, DocumentValues,
};

use crate::error::SyncError;
use crate::writer::atomic_write;

pub const ID_FIELD: &str = "esp_id_number";
pub const NAME_FIELD: &str = "full_legal_name";
pub const USERNAME_FIELD: &str = "esp_username";

/// Record of one successfully generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub key: SubmitterKey,
    pub version: u32,
    pub base_name: String,
    pub source: PathBuf,
}

fn required<'r>(resolved: &'r BTreeMap<String, String>, name: &str) -> Result<&'r str, ResolveError> {
    resolved
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ResolveError::FieldNotFound {
            field: name.to_string(),
            ids: Vec::new(),
        })
}

/// Parse the submitter's id number into a ledger key.
pub fn submitter_key(raw: &str) -> Result<SubmitterKey, ResolveError> {
    raw.trim()
        .parse::<u64>()
        .map(SubmitterKey)
        .map_err(|e| ResolveError::Data {
            field: ID_FIELD.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

pub struct DocumentGenerator<'a> {
    archive_dir: &'a Path,
    template: &'a str,
    renderer: &'a dyn DocumentRenderer,
}

impl<'a> DocumentGenerator<'a> {
    pub fn new(archive_dir: &'a Path, template: &'a str, renderer: &'a dyn DocumentRenderer) -> Self {
        Self {
            archive_dir,
            template,
            renderer,
        }
    }

    /// Generate the document for `submission`.
    ///
    /// The version slot is taken from `ledger` up front but only committed,
    /// together with the processed id, once the source is written and the
    /// renderer has run. On error neither `ledger` nor `processed` changes.
    pub fn generate(
        &self,
        submission: &Submission,
        field_map: &FieldMap,
        ledger: &mut VersionLedger,
        processed: &mut ProcessedSet,
    ) -> Result<Generated, SyncError> {
        let resolved = field_map.resolve(submission)?;
        let key = submitter_key(required(&resolved, ID_FIELD)?)?;
        let formatted_date = format_long_date(&submission.timestamp)?;

        let slot = ledger.next_slot(key);
        let identity = identity_line(
            required(&resolved, ID_FIELD)?,
            required(&resolved, NAME_FIELD)?,
            required(&resolved, USERNAME_FIELD)?,
        );
        let base_name = artifact_base_name(&identity, slot.version);

        let values = DocumentValues::new(&resolved, slot.version, &formatted_date);
        let source = self.archive_dir.join(format!("{base_name}.tex"));
        atomic_write(&source, &values.interpolate(self.template))?;
        self.renderer.render(&source, self.archive_dir)?;

        let version = slot.version;
        ledger.commit(slot, base_name.clone());
        processed.insert(submission.id.clone());
        tracing::debug!(submission = %submission.id, key = key.0, version, "generated {base_name}");

        Ok(Generated {
            key,
            version,
            base_name,
            source,
        })
    }
}
