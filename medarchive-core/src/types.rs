//! Domain types shared by every medarchive crate.
//!
//! Identifiers coming from the forms service are sometimes encoded as JSON
//! strings and sometimes as numbers; every id type here accepts both and always
//! serializes as a string.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Raw JSON id: either a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(raw: TextOrNumber) -> Self {
        match raw {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize a JSON string or number into its textual form.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

/// Deserialize a count that the API may report as `"42"` or `42`.
pub fn count_from_text_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = text_or_number(deserializer)?;
    text.trim()
        .parse::<u64>()
        .map_err(|_| serde::de::Error::custom(format!("invalid count '{text}'")))
}

/// Remote identifier of a single form submission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "TextOrNumber", into = "String")]
pub struct SubmissionId(pub String);

impl From<TextOrNumber> for SubmissionId {
    fn from(raw: TextOrNumber) -> Self {
        Self(raw.into())
    }
}

impl From<SubmissionId> for String {
    fn from(id: SubmissionId) -> Self {
        id.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SubmissionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SubmissionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Stable per-person grouping key, parsed from the `esp_id_number` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitterKey(pub u64);

impl fmt::Display for SubmitterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for SubmitterKey {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// Remote form metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRef {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    pub name: String,
    /// Submission count as reported by the service.
    #[serde(deserialize_with = "count_from_text_or_number")]
    pub submissions: u64,
}

impl FormRef {
    /// Program label derived from the form title: every word but the last.
    ///
    /// `"Splash 2014 Medical"` → `"Splash 2014"`.
    pub fn program_label(&self) -> String {
        let words: Vec<&str> = self.name.split(' ').collect();
        words[..words.len().saturating_sub(1)].join(" ")
    }
}

/// One field definition of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A single `(field id, value)` pair of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(deserialize_with = "text_or_number")]
    pub field: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// A fetched submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    /// `%Y-%m-%d %H:%M:%S` as sent by the service.
    pub timestamp: String,
    #[serde(default)]
    pub data: Vec<FieldValue>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
