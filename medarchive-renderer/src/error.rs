//! Error types for medarchive-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while producing documents and manifests.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (manifest).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while writing a source document.
    #[error("render io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// The external renderer could not be started at all.
    #[error("failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}
