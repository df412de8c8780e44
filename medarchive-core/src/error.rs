//! Error types for medarchive-core.

use std::path::PathBuf;

use thiserror::Error;

/// Setup-time failures. Nothing has been processed when one of these surfaces,
/// so there is never partial state to save.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A name from the required-field contract has no field in the form.
    #[error("no field found with name '{name}'")]
    MissingField { name: String },

    /// A prerequisite local file (template, state file) is absent.
    #[error("missing required file: {path}")]
    MissingFile { path: PathBuf },

    #[error("the given path does not point to a valid directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("the specified directory is not empty: {path}")]
    DirectoryNotEmpty { path: PathBuf },

    /// Settings YAML could not be read or parsed.
    #[error("invalid settings at {path}: {message}")]
    Settings { path: PathBuf, message: String },
}

/// A submission could not be mapped onto the logical fields.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// None of the field's remote identifiers appear in the submission.
    #[error("field '{field}' not found in submission (ids: {})", ids.join(", "))]
    FieldNotFound { field: String, ids: Vec<String> },

    /// A resolved value could not be interpreted (e.g. a non-numeric id).
    #[error("invalid value '{value}' for '{field}': {reason}")]
    Data {
        field: String,
        value: String,
        reason: String,
    },
}

/// Failures while loading or saving the archive state file.
#[derive(Debug, Error)]
pub enum StateError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (save path).
    #[error("state serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load.
    #[error("failed to parse archive state at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The state file did not exist at the expected path.
    #[error("archive state not found at {path}")]
    NotFound { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source,
    }
}
