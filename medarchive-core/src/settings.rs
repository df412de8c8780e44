//! Run settings loaded from YAML.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```yaml
//! api_base: https://www.formstack.com/api/v2/
//! organization: MIT Educational Studies Program
//! renderer:
//!   program: pdflatex
//!   args: ["-interaction=nonstopmode"]
//! checkpoint_every: 25
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// External renderer command line. The source path and the
/// `-output-directory=<archive>` flag are appended by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: "pdflatex".to_string(),
            args: vec!["-interaction=nonstopmode".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Forms API root, with trailing slash.
    pub api_base: String,
    /// Registration website root used by `check`, with trailing slash.
    pub website_base: String,
    /// Second manifest header line.
    pub organization: String,
    /// Third manifest header line.
    pub contact: String,
    pub renderer: RendererSettings,
    /// Extension of rendered artifacts, without the dot.
    pub artifact_extension: String,
    pub manifest_name: String,
    /// Save state after this many newly processed submissions; 0 disables.
    pub checkpoint_every: usize,
    /// Delay between retries of a failed connection.
    pub retry_delay_secs: u64,
    /// Give up after this many connection attempts; unbounded when absent.
    pub max_attempts: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "https://www.formstack.com/api/v2/".to_string(),
            website_base: "https://esp.mit.edu/".to_string(),
            organization: "MIT Educational Studies Program".to_string(),
            contact: "esp@mit.edu  |  (617) 253-4882".to_string(),
            renderer: RendererSettings::default(),
            artifact_extension: "pdf".to_string(),
            manifest_name: "000 - index.txt".to_string(),
            checkpoint_every: 25,
            retry_delay_secs: 5,
            max_attempts: None,
            timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Parse settings from the YAML file at `path`.
    pub fn load_at(path: &Path) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| ConfigurationError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// `<config_dir>/medarchive/settings.yaml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medarchive").join("settings.yaml"))
    }

    /// Load `explicit` if given (it must exist), else the default path if it
    /// exists, else built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigurationError> {
        if let Some(path) = explicit {
            return Self::load_at(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::load_at(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
