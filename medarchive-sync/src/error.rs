//! Error types for medarchive-sync.

use std::path::PathBuf;

use thiserror::Error;

use medarchive_core::{ConfigurationError, ResolveError, StateError};
use medarchive_renderer::RenderError;

use crate::transport::TransportError;

/// End-of-run artifact check failures.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// A ledger entry has no rendered artifact on disk.
    #[error("missing file: {}", .path.display())]
    MissingArtifact { path: PathBuf },
}

/// All errors that can arise from an archive run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Setup-time failure; nothing was processed.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Remote API failure after the transport's retry policy.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// A submission could not be mapped onto the required fields.
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// An expected artifact is missing at the end of the run.
    #[error("{0}")]
    Verification(#[from] VerificationError),

    /// Source document could not be written or the renderer not started.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// State file could not be read or written.
    #[error("{0}")]
    State(#[from] StateError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Configuration errors happen before any work, so they never leave
    /// partial state worth saving.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SyncError::Configuration(_))
    }

    /// Short name of the error class, for the one-line failure summary.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) => "ConfigurationError",
            SyncError::Transport(_) => "TransportError",
            SyncError::Resolve(ResolveError::FieldNotFound { .. }) => "FieldResolutionError",
            SyncError::Resolve(ResolveError::Data { .. }) => "DataError",
            SyncError::Verification(_) => "VerificationError",
            SyncError::Render(_) => "RenderError",
            SyncError::State(_) => "StateError",
            SyncError::Io { .. } => "IoError",
        }
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
