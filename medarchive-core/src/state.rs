//! Archive state file.
//!
//! # Storage layout
//!
//! ```text
//! <archive>/
//!   state.json            (mode 0600: form, program, field_map, ledger, processed)
//!   000 - index.txt       (manifest)
//!   <base name>.pdf       (one per submitter version)
//! ```
//!
//! Writes go to a `state.json.tmp` sibling, get `chmod 0600`, then `rename`
//! over the target, so a reader only ever sees a complete file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StateError};
use crate::fields::FieldMap;
use crate::ledger::{ProcessedSet, VersionLedger};
use crate::types::FormRef;

/// File name of the state document inside an archive directory.
pub const STATE_FILE: &str = "state.json";

/// Everything a later `update` run needs to resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveState {
    pub form: FormRef,
    pub program: String,
    pub field_map: FieldMap,
    #[serde(default)]
    pub ledger: VersionLedger,
    #[serde(default)]
    pub processed: ProcessedSet,
}

impl ArchiveState {
    /// Fresh state for a first run against `form`.
    pub fn new(form: FormRef, program: String, field_map: FieldMap) -> Self {
        Self {
            form,
            program,
            field_map,
            ledger: VersionLedger::new(),
            processed: ProcessedSet::new(),
        }
    }
}

/// `<archive>/state.json`. Pure, no I/O.
pub fn state_path_at(archive: &Path) -> PathBuf {
    archive.join(STATE_FILE)
}

/// Load the state stored in `archive`.
///
/// Returns `StateError::NotFound` if absent, `StateError::Parse` if malformed.
pub fn load_at(archive: &Path) -> Result<ArchiveState, StateError> {
    let path = state_path_at(archive);
    if !path.exists() {
        return Err(StateError::NotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&contents).map_err(|source| StateError::Parse { path, source })
}

/// Atomically save `state` into `archive`.
pub fn save_at(archive: &Path, state: &ArchiveState) -> Result<(), StateError> {
    let path = state_path_at(archive);
    let tmp = path.with_extension("json.tmp");

    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    tracing::debug!(
        path = %path.display(),
        processed = state.processed.len(),
        submitters = state.ledger.len(),
        "saved archive state"
    );
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StateError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StateError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;
    use tempfile::TempDir;

    fn state() -> ArchiveState {
        let field_map = FieldMap::build(
            &[FieldDef { id: "1".into(), name: "esp_id_number".into() }],
            &["esp_id_number"],
        )
        .unwrap();
        ArchiveState::new(
            FormRef { id: "42".into(), name: "Splash 2014 Medical".into(), submissions: 3 },
            "Splash 2014".into(),
            field_map,
        )
    }

    #[test]
    fn state_path_is_inside_archive() {
        let dir = TempDir::new().unwrap();
        assert!(state_path_at(dir.path()).ends_with("state.json"));
    }

    #[test]
    fn missing_state_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_at(dir.path()).unwrap_err();
        assert!(matches!(err, StateError::NotFound { .. }));
    }

    #[test]
    fn malformed_state_reports_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(state_path_at(dir.path()), "{ not json").unwrap();
        let err = load_at(dir.path()).unwrap_err();
        assert!(err.to_string().contains("state.json"));
    }

    #[test]
    fn atomic_write_cleans_up_tmp() {
        let dir = TempDir::new().unwrap();
        save_at(dir.path(), &state()).unwrap();
        assert!(!dir.path().join("state.json.tmp").exists());
        assert!(state_path_at(dir.path()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn state_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        save_at(dir.path(), &state()).unwrap();
        let mode = std::fs::metadata(state_path_at(dir.path())).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
