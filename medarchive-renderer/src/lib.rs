//! # medarchive-renderer
//!
//! Turns resolved form values into documents: LaTeX escaping, artifact naming,
//! `[[name]]` interpolation, the external renderer subprocess, and the archive
//! manifest.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use medarchive_renderer::{DocumentRenderer, DocumentValues, ExternalRenderer};
//!
//! fn render_one(resolved: &BTreeMap<String, String>, template: &str, dir: &Path) {
//!     let values = DocumentValues::new(resolved, 1, "March 04, 2014");
//!     let source = dir.join("doc.tex");
//!     if std::fs::write(&source, values.interpolate(template)).is_ok() {
//!         let renderer = ExternalRenderer::new("pdflatex", vec![]);
//!         let _ = renderer.render(&source, dir);
//!     }
//! }
//! ```

pub mod document;
pub mod engine;
pub mod error;
pub mod escape;
pub mod manifest;
pub mod naming;

pub use document::{format_long_date, DocumentValues};
pub use engine::{DocumentRenderer, ExternalRenderer};
pub use error::RenderError;
pub use escape::latex_escape;
pub use manifest::{ManifestContext, ManifestRenderer};
pub use naming::{artifact_base_name, identity_line, sanitize_filename};
