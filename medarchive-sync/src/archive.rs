//! Archive index and end-of-run verification.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use medarchive_core::{Settings, VersionLedger};
use medarchive_renderer::{ManifestContext, ManifestRenderer};

use crate::error::{io_err, SyncError, VerificationError};
use crate::writer::atomic_write;

/// Renderer by-products removed before verification.
pub const AUXILIARY_EXTENSIONS: &[&str] = &["tex", "log", "aux"];

/// Write the manifest listing every contiguous artifact in the ledger.
pub fn write_manifest(
    archive_dir: &Path,
    settings: &Settings,
    program: &str,
    ledger: &VersionLedger,
    now: DateTime<Local>,
) -> Result<PathBuf, SyncError> {
    let ctx = ManifestContext::from_ledger(
        program,
        &settings.organization,
        &settings.contact,
        now,
        ledger,
    );
    let text = ManifestRenderer::new()?.render(&ctx)?;
    let path = archive_dir.join(&settings.manifest_name);
    atomic_write(&path, &text)?;
    tracing::info!(entries = ctx.entries.len(), "wrote {}", path.display());
    Ok(path)
}

/// Delete renderer by-products from the top level of `archive_dir`.
pub fn remove_auxiliary_files(archive_dir: &Path) -> Result<usize, SyncError> {
    let entries = std::fs::read_dir(archive_dir).map_err(|e| io_err(archive_dir, e))?;
    let mut removed = 0;
    for entry in entries {
        let path = entry.map_err(|e| io_err(archive_dir, e))?.path();
        let auxiliary = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| AUXILIARY_EXTENSIONS.contains(&ext));
        if auxiliary && path.is_file() {
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
            removed += 1;
        }
    }
    tracing::debug!(removed, "removed auxiliary files");
    Ok(removed)
}

/// Check that every contiguous ledger version has `<base>.<extension>` on
/// disk. Keys ascending, versions from 1; the first gap is reported.
pub fn verify_artifacts(
    archive_dir: &Path,
    ledger: &VersionLedger,
    extension: &str,
) -> Result<usize, VerificationError> {
    let mut verified = 0;
    for (_, _, base_name) in ledger.artifacts() {
        let path = archive_dir.join(format!("{base_name}.{extension}"));
        if !path.is_file() {
            return Err(VerificationError::MissingArtifact { path });
        }
        verified += 1;
    }
    Ok(verified)
}

/// Cleanup followed by verification.
pub fn finalize(archive_dir: &Path, ledger: &VersionLedger, extension: &str) -> Result<usize, SyncError> {
    remove_auxiliary_files(archive_dir)?;
    let verified = verify_artifacts(archive_dir, ledger, extension)?;
    tracing::info!(verified, "all artifacts present");
    Ok(verified)
}
