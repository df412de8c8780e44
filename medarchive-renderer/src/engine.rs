//! External document renderer: the [`DocumentRenderer`] trait and the
//! subprocess-backed [`ExternalRenderer`].
//!
//! Rendering is best-effort: a renderer that exits non-zero or produces no
//! output is *not* an error here. Missing artifacts are detected once, after
//! the whole run, by the archive verifier. Only a renderer that cannot be
//! started at all fails the call.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use medarchive_core::RendererSettings;

use crate::error::{io_err, RenderError};

/// Turns a written source document into an artifact inside `output_dir`.
pub trait DocumentRenderer {
    fn render(&self, source: &Path, output_dir: &Path) -> Result<(), RenderError>;
}

/// Runs an external compiler such as `pdflatex` as a blocking subprocess.
///
/// Command line: `<program> <args…> -output-directory=<dir> <source>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRenderer {
    program: String,
    args: Vec<String>,
}

impl ExternalRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn from_settings(settings: &RendererSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The command that [`render`](DocumentRenderer::render) would spawn.
    ///
    /// The compiler runs inside `output_dir`, so both paths are made absolute
    /// against the caller's working directory first.
    pub fn command(&self, source: &Path, output_dir: &Path) -> Result<Command, RenderError> {
        let source = absolute(source)?;
        let output_dir = absolute(output_dir)?;
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(format!("-output-directory={}", output_dir.display()))
            .arg(&source)
            .current_dir(&output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Ok(cmd)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, RenderError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| io_err(path, e))?;
    Ok(cwd.join(path))
}

impl DocumentRenderer for ExternalRenderer {
    fn render(&self, source: &Path, output_dir: &Path) -> Result<(), RenderError> {
        let status = self
            .command(source, output_dir)?
            .status()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            tracing::debug!(source = %source.display(), "renderer finished");
        } else {
            tracing::warn!(
                source = %source.display(),
                status = %status,
                "renderer exited unsuccessfully; artifact will be checked at verification"
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use tempfile::TempDir;

    #[test]
    fn command_line_shape() {
        let renderer = ExternalRenderer::new("pdflatex", vec!["-interaction=nonstopmode".into()]);
        let out = Path::new("/archive");
        let cmd = renderer.command(Path::new("/archive/doc.tex"), out).unwrap();
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(cmd.get_program(), "pdflatex");
        assert_eq!(
            args,
            vec![
                OsStr::new("-interaction=nonstopmode"),
                OsStr::new("-output-directory=/archive"),
                OsStr::new("/archive/doc.tex"),
            ]
        );
    }

    #[test]
    fn relative_paths_are_made_absolute() {
        let renderer = ExternalRenderer::new("pdflatex", vec![]);
        let cmd = renderer
            .command(Path::new("archive/doc.tex"), Path::new("archive"))
            .unwrap();
        let cwd = std::env::current_dir().unwrap();
        let args: Vec<&OsStr> = cmd.get_args().collect();
        let expected_out = format!("-output-directory={}", cwd.join("archive").display());
        assert_eq!(args[0], OsStr::new(&expected_out));
        assert_eq!(args[1], cwd.join("archive/doc.tex").as_os_str());
        assert_eq!(cmd.get_current_dir(), Some(cwd.join("archive").as_path()));
    }

    #[test]
    fn from_settings_uses_defaults() {
        let renderer = ExternalRenderer::from_settings(&RendererSettings::default());
        assert_eq!(renderer.program(), "pdflatex");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let renderer = ExternalRenderer::new("medarchive-no-such-renderer", vec![]);
        let err = renderer.render(&dir.path().join("x.tex"), dir.path()).unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_renderer_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let renderer = ExternalRenderer::new("false", vec![]);
        renderer
            .render(&dir.path().join("x.tex"), dir.path())
            .expect("non-zero exit must be tolerated");
    }
}
