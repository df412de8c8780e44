//! Document values and `[[name]]` placeholder interpolation.
//!
//! Templates are plain LaTeX with `[[logical_name]]` placeholders. Besides the
//! form's logical fields, two synthesized values are available:
//! `[[version]]` and `[[formatted_date]]`.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use medarchive_core::ResolveError;

use crate::escape::latex_escape;

pub const VERSION_KEY: &str = "version";
pub const FORMATTED_DATE_KEY: &str = "formatted_date";

/// Timestamp format used by the forms service.
pub const SUBMISSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Long-form date printed on documents, e.g. `March 04, 2014`.
pub const LONG_DATE_FORMAT: &str = "%B %d, %Y";

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// Reformat a submission timestamp as a long-form date.
pub fn format_long_date(timestamp: &str) -> Result<String, ResolveError> {
    NaiveDateTime::parse_from_str(timestamp.trim(), SUBMISSION_TIMESTAMP_FORMAT)
        .map(|dt| dt.format(LONG_DATE_FORMAT).to_string())
        .map_err(|e| ResolveError::Data {
            field: "timestamp".to_string(),
            value: timestamp.to_string(),
            reason: e.to_string(),
        })
}

/// Escaped placeholder values for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentValues {
    values: BTreeMap<String, String>,
}

impl DocumentValues {
    /// Escape every resolved value and add the synthesized `version` and
    /// `formatted_date` entries.
    pub fn new(resolved: &BTreeMap<String, String>, version: u32, formatted_date: &str) -> Self {
        let mut values: BTreeMap<String, String> = resolved
            .iter()
            .map(|(name, value)| (name.clone(), latex_escape(value)))
            .collect();
        values.insert(VERSION_KEY.to_string(), version.to_string());
        values.insert(FORMATTED_DATE_KEY.to_string(), latex_escape(formatted_date));
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every known `[[name]]` in `template` with its value.
    ///
    /// Single left-to-right pass: substituted text is never rescanned, and
    /// unknown placeholders are copied through unchanged. Each `]]` closes the
    /// nearest `[[` before it, so stray brackets ahead of a placeholder stay
    /// literal (`[[a[[version]]` → `[[a2`).
    pub fn interpolate(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(close) = rest.find(CLOSE) {
            let after_close = close + CLOSE.len();
            match rest[..close].rfind(OPEN) {
                Some(open) => {
                    out.push_str(&rest[..open]);
                    match self.values.get(&rest[open + OPEN.len()..close]) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[open..after_close]),
                    }
                }
                None => out.push_str(&rest[..after_close]),
            }
            rest = &rest[after_close..];
        }
        out.push_str(rest);
        out
    }
}
