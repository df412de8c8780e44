//! Run orchestration for `complete` and `update`.
//!
//! A run is: set up or load [`ArchiveState`], list the form's submissions
//! oldest first, generate every one not yet processed, write the manifest,
//! save state, then clean up and verify. Any failure ends the run; if at least
//! one submission was processed and the failure is not a configuration error,
//! state is saved first so `update` can pick up where the run stopped.

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use medarchive_core::{
    state::{self, ArchiveState},
    ConfigurationError, FieldMap, Settings, StateError, REQUIRED_FIELDS,
};
use medarchive_renderer::DocumentRenderer;

use crate::api::FormsApi;
use crate::archive;
use crate::error::SyncError;
use crate::generator::{DocumentGenerator, Generated};
use crate::transport::Transport;

/// What kind of run to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Build a new archive from scratch in an empty directory.
    Complete {
        form_id: String,
        /// Overrides the label derived from the form name.
        program: Option<String>,
    },
    /// Continue an existing archive from its `state.json`.
    Update,
}

/// API credentials. Plain inputs; how they were obtained is the caller's
/// business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub passphrase: Option<String>,
}

/// Everything a run needs that does not change while it runs.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub archive_dir: PathBuf,
    pub template: String,
    pub settings: Settings,
}

impl RunContext {
    /// Read the document template. A missing template is a configuration
    /// error.
    pub fn load(
        archive_dir: impl Into<PathBuf>,
        template_path: &Path,
        settings: Settings,
    ) -> Result<Self, ConfigurationError> {
        let template = std::fs::read_to_string(template_path).map_err(|_| {
            ConfigurationError::MissingFile {
                path: template_path.to_path_buf(),
            }
        })?;
        Ok(Self {
            archive_dir: archive_dir.into(),
            template,
            settings,
        })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub program: String,
    /// Submissions listed by the service.
    pub total: usize,
    /// Listed submissions that were already processed before this run.
    pub already_processed: usize,
    pub generated: Vec<Generated>,
    pub verified: usize,
    pub manifest: PathBuf,
}

/// A failed run, and whether partial progress was saved.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunFailure {
    #[source]
    pub error: SyncError,
    pub state_saved: bool,
}

/// Execute one run and apply the save-on-failure policy.
pub fn run(
    ctx: &RunContext,
    mode: RunMode,
    transport: &dyn Transport,
    renderer: &dyn DocumentRenderer,
    credentials: &Credentials,
) -> Result<RunSummary, RunFailure> {
    let api = FormsApi::new(transport, &credentials.token, credentials.passphrase.as_deref());
    let mut slot: Option<ArchiveState> = None;
    match execute(ctx, mode, &api, renderer, &mut slot) {
        Ok(summary) => Ok(summary),
        Err(error) => {
            let state_saved = save_after_failure(&ctx.archive_dir, &error, slot.as_ref());
            Err(RunFailure { error, state_saved })
        }
    }
}

fn execute(
    ctx: &RunContext,
    mode: RunMode,
    api: &FormsApi<'_>,
    renderer: &dyn DocumentRenderer,
    slot: &mut Option<ArchiveState>,
) -> Result<RunSummary, SyncError> {
    let initial = match mode {
        RunMode::Complete { form_id, program } => {
            require_empty_dir(&ctx.archive_dir)?;
            let form = api.form(&form_id)?;
            let program = program.unwrap_or_else(|| form.program_label());
            tracing::info!(form = %form.id, program = %program, "starting complete download");
            let field_map = FieldMap::build(&api.fields(&form.id)?, REQUIRED_FIELDS)?;
            ArchiveState::new(form, program, field_map)
        }
        RunMode::Update => {
            let mut existing = load_existing(&ctx.archive_dir)?;
            // The stored count is from the previous run; page over the current one.
            existing.form = api.form(&existing.form.id)?;
            tracing::info!(program = %existing.program, "updating archive");
            existing
        }
    };
    let st = slot.insert(initial);

    let ids = api.submission_ids(&st.form)?;
    let total = ids.len();
    let already_processed = ids.iter().filter(|id| st.processed.contains(id)).count();
    tracing::info!(total, already_processed, "submissions to consider");

    let generator = DocumentGenerator::new(&ctx.archive_dir, &ctx.template, renderer);
    let mut generated = Vec::new();
    let mut since_checkpoint = 0;
    for id in &ids {
        if st.processed.contains(id) {
            continue;
        }
        let submission = api.submission(id)?;
        let out = generator.generate(
            &submission,
            &st.field_map,
            &mut st.ledger,
            &mut st.processed,
        )?;
        tracing::info!("Downloaded {}/{}: {}", st.processed.len(), total, out.base_name);
        generated.push(out);

        since_checkpoint += 1;
        if ctx.settings.checkpoint_every > 0 && since_checkpoint >= ctx.settings.checkpoint_every {
            state::save_at(&ctx.archive_dir, st)?;
            tracing::debug!(processed = st.processed.len(), "checkpoint saved");
            since_checkpoint = 0;
        }
    }

    let manifest = archive::write_manifest(
        &ctx.archive_dir,
        &ctx.settings,
        &st.program,
        &st.ledger,
        Local::now(),
    )?;
    state::save_at(&ctx.archive_dir, st)?;
    let verified = archive::finalize(&ctx.archive_dir, &st.ledger, &ctx.settings.artifact_extension)?;

    Ok(RunSummary {
        program: st.program.clone(),
        total,
        already_processed,
        generated,
        verified,
        manifest,
    })
}

/// Save `current` after a failed run when that preserves real progress.
///
/// Returns whether the state file was written.
fn save_after_failure(archive_dir: &Path, error: &SyncError, current: Option<&ArchiveState>) -> bool {
    if error.is_configuration() {
        return false;
    }
    let Some(st) = current.filter(|s| !s.processed.is_empty()) else {
        return false;
    };
    match state::save_at(archive_dir, st) {
        Ok(()) => {
            tracing::info!(processed = st.processed.len(), "state saved after failure");
            true
        }
        Err(e) => {
            tracing::error!("could not save state after failure: {e}");
            false
        }
    }
}

fn require_dir(dir: &Path) -> Result<(), ConfigurationError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ConfigurationError::NotADirectory {
            path: dir.to_path_buf(),
        })
    }
}

fn require_empty_dir(dir: &Path) -> Result<(), SyncError> {
    require_dir(dir)?;
    let mut entries = std::fs::read_dir(dir).map_err(|e| crate::error::io_err(dir, e))?;
    if entries.next().is_some() {
        return Err(ConfigurationError::DirectoryNotEmpty {
            path: dir.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Load the state of an existing archive. A missing state file is a
/// configuration error; a corrupt one is a state error.
pub fn load_existing(dir: &Path) -> Result<ArchiveState, SyncError> {
    require_dir(dir)?;
    match state::load_at(dir) {
        Ok(state) => Ok(state),
        Err(StateError::NotFound { path }) => Err(ConfigurationError::MissingFile { path }.into()),
        Err(e) => Err(e.into()),
    }
}
