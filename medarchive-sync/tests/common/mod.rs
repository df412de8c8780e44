//! In-memory forms service and renderer shared by the pipeline tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use medarchive_core::REQUIRED_FIELDS;
use medarchive_renderer::{DocumentRenderer, RenderError};
use medarchive_sync::{Credentials, Transport, TransportError};

pub const FORM_ID: &str = "9";
pub const TEMPLATE: &str = "[[full_legal_name]] ([[esp_username]]) v[[version]] [[formatted_date]]";

/// Remote field id backing a required name.
pub fn field_id(name: &str) -> String {
    let index = REQUIRED_FIELDS
        .iter()
        .position(|n| *n == name)
        .unwrap_or_else(|| panic!("{name} is not a required field"));
    (100 + index).to_string()
}

/// One student's submission as the service would return it.
pub fn submission(id: u64, esp_id: u64, name: &str, username: &str) -> Value {
    let data: Vec<Value> = REQUIRED_FIELDS
        .iter()
        .map(|field| {
            let value = match *field {
                "esp_id_number" => esp_id.to_string(),
                "full_legal_name" => name.to_string(),
                "esp_username" => username.to_string(),
                other => format!("{other} of {username}"),
            };
            json!({ "field": field_id(field), "value": value })
        })
        .collect();
    json!({ "id": id.to_string(), "timestamp": "2014-03-04 17:22:09", "data": data })
}

/// Forms service double. Records every endpoint requested.
pub struct FakeForms {
    pub fields: Vec<&'static str>,
    pub submissions: RefCell<Vec<Value>>,
    /// Submission ids whose detail request fails.
    pub failing: RefCell<BTreeSet<String>>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeForms {
    pub fn new(submissions: Vec<Value>) -> Self {
        Self {
            fields: REQUIRED_FIELDS.to_vec(),
            submissions: RefCell::new(submissions),
            failing: RefCell::new(BTreeSet::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn without_field(mut self, name: &str) -> Self {
        self.fields.retain(|f| *f != name);
        self
    }

    pub fn push(&self, submission: Value) {
        self.submissions.borrow_mut().push(submission);
    }

    pub fn fail_detail(&self, id: &str) {
        self.failing.borrow_mut().insert(id.to_string());
    }

    pub fn heal(&self) {
        self.failing.borrow_mut().clear();
    }

    pub fn detail_requests(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|e| e.starts_with("submission/"))
            .count()
    }

    fn submission_ids_page(&self, page: usize, per_page: usize) -> Value {
        let ids: Vec<Value> = self
            .submissions
            .borrow()
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|s| json!({ "id": s["id"].clone() }))
            .collect();
        json!({ "submissions": ids })
    }
}

fn param<'p>(params: &[(&'p str, &'p str)], key: &str) -> Option<&'p str> {
    params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

impl Transport for FakeForms {
    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, TransportError> {
        self.requests.borrow_mut().push(endpoint.to_string());
        let not_found = || TransportError::Http {
            url: endpoint.to_string(),
            status: 404,
            body: String::new(),
        };

        if endpoint == format!("form/{FORM_ID}.json") {
            let count = self.submissions.borrow().len();
            return Ok(json!({ "id": FORM_ID, "name": "Splash 2014 Medical", "submissions": count.to_string() })
                .to_string());
        }
        if endpoint == format!("form/{FORM_ID}/field.json") {
            let defs: Vec<Value> = self
                .fields
                .iter()
                .map(|name| json!({ "id": field_id(name), "name": name }))
                .chain(std::iter::once(json!({ "id": "1", "name": "" })))
                .collect();
            return Ok(Value::Array(defs).to_string());
        }
        if endpoint == format!("form/{FORM_ID}/submission.json") {
            let page: usize = param(params, "page").and_then(|p| p.parse().ok()).ok_or_else(not_found)?;
            let per_page: usize = param(params, "per_page").and_then(|p| p.parse().ok()).ok_or_else(not_found)?;
            return Ok(self.submission_ids_page(page, per_page).to_string());
        }
        if let Some(id) = endpoint.strip_prefix("submission/").and_then(|r| r.strip_suffix(".json")) {
            if self.failing.borrow().contains(id) {
                return Err(TransportError::Http {
                    url: endpoint.to_string(),
                    status: 500,
                    body: "upstream failure".into(),
                });
            }
            return self
                .submissions
                .borrow()
                .iter()
                .find(|s| s["id"] == id)
                .map(Value::to_string)
                .ok_or_else(not_found);
        }
        Err(not_found())
    }

    fn post_form(&self, url: &str, _fields: &[(&str, &str)]) -> Result<String, TransportError> {
        Err(TransportError::Api { url: url.to_string() })
    }
}

/// Renderer double: writes `<base>.pdf` plus the usual by-products, except
/// for base names listed in `skip`.
#[derive(Default)]
pub struct FakeRenderer {
    pub skip: RefCell<BTreeSet<String>>,
    pub rendered: RefCell<Vec<PathBuf>>,
}

impl FakeRenderer {
    pub fn skipping(base_name: &str) -> Self {
        let renderer = Self::default();
        renderer.skip.borrow_mut().insert(base_name.to_string());
        renderer
    }
}

impl DocumentRenderer for FakeRenderer {
    fn render(&self, source: &Path, _output_dir: &Path) -> Result<(), RenderError> {
        self.rendered.borrow_mut().push(source.to_path_buf());
        let base = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        for ext in ["log", "aux"] {
            std::fs::write(source.with_extension(ext), "").map_err(|e| RenderError::Io {
                path: source.to_path_buf(),
                source: e,
            })?;
        }
        if !self.skip.borrow().contains(&base) {
            std::fs::write(source.with_extension("pdf"), "%PDF-1.4").map_err(|e| RenderError::Io {
                path: source.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        token: "token".into(),
        passphrase: Some("secret".into()),
    }
}
