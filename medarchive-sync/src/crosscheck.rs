//! Cross-check of an archive against the program website's registrations.
//!
//! The website answers a POST to `medicalsyncapi` with two objects keyed by
//! student id: `submitted` (students expected to have a form) and `bypass`
//! (students exempted). A submitted student is missing when their id is not a
//! submitter key in the ledger.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use medarchive_core::{Settings, SubmitterKey, VersionLedger};

use crate::error::SyncError;
use crate::pipeline::load_existing;
use crate::transport::{Transport, TransportError};

/// Path of the sync endpoint relative to the website base.
pub const SYNC_ENDPOINT: &str = "medicalsyncapi";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Registrations {
    pub submitted: BTreeMap<String, String>,
    pub bypass: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossCheckReport {
    pub program: String,
    /// Names of submitted students with no archived form, sorted.
    pub missing: Vec<String>,
    /// Names of exempted students, sorted.
    pub bypassed: Vec<String>,
}

/// Compare website registrations with the ledger.
pub fn compare(program: &str, registrations: &Registrations, ledger: &VersionLedger) -> CrossCheckReport {
    let mut missing: Vec<String> = registrations
        .submitted
        .iter()
        .filter(|(id, _)| {
            !id.trim()
                .parse::<u64>()
                .is_ok_and(|key| ledger.contains_key(SubmitterKey(key)))
        })
        .map(|(_, name)| name.clone())
        .collect();
    missing.sort();
    let mut bypassed: Vec<String> = registrations.bypass.values().cloned().collect();
    bypassed.sort();
    CrossCheckReport {
        program: program.to_string(),
        missing,
        bypassed,
    }
}

/// Parse the website's answer. Both objects must be present.
pub fn parse_registrations(url: &str, body: &str) -> Result<Registrations, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::Malformed {
        url: url.to_string(),
        message: format!("invalid response from program website: {e}"),
    })
}

/// Run the cross-check for the archive in `archive_dir`. Never writes state.
pub fn check(
    archive_dir: &Path,
    settings: &Settings,
    transport: &dyn Transport,
    username: &str,
    password: &str,
) -> Result<CrossCheckReport, SyncError> {
    let archive = load_existing(archive_dir)?;
    let url = format!("{}{}", settings.website_base, SYNC_ENDPOINT);
    tracing::info!(program = %archive.program, "cross-checking registrations");
    let body = transport.post_form(
        &url,
        &[
            ("username", username),
            ("password", password),
            ("program", archive.program.as_str()),
        ],
    )?;
    let registrations = parse_registrations(&url, &body)?;
    Ok(compare(&archive.program, &registrations, &archive.ledger))
}
