//! Read-only Formstack v2 endpoints: forms, fields, submission listing and
//! submission detail.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use medarchive_core::{FieldDef, FormRef, Submission, SubmissionId};

use crate::transport::{Transport, TransportError};

/// Submissions requested per listing page.
pub const PAGE_SIZE: u64 = 100;

/// Folder whose forms are listed first when present.
pub const MEDICAL_FOLDER: &str = "Medical";

#[derive(Debug, Deserialize)]
struct FolderedForms {
    forms: BTreeMap<String, Vec<FormRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldList {
    Bare(Vec<FieldDef>),
    Wrapped { fields: Vec<FieldDef> },
}

#[derive(Debug, Deserialize)]
struct ListedSubmission {
    id: SubmissionId,
}

#[derive(Debug, Deserialize)]
struct SubmissionPage {
    #[serde(default)]
    submissions: Vec<ListedSubmission>,
}

/// Number of listing pages for a reported submission count.
pub fn page_count(submissions: u64) -> u64 {
    submissions.div_ceil(PAGE_SIZE)
}

/// Authenticated view of the forms service.
pub struct FormsApi<'a> {
    transport: &'a dyn Transport,
    token: &'a str,
    passphrase: Option<&'a str>,
}

impl<'a> FormsApi<'a> {
    pub fn new(transport: &'a dyn Transport, token: &'a str, passphrase: Option<&'a str>) -> Self {
        Self {
            transport,
            token,
            passphrase,
        }
    }

    fn query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
        encrypted: bool,
    ) -> Result<T, TransportError> {
        let mut params: Vec<(&str, &str)> = extra.to_vec();
        params.push(("oauth_token", self.token));
        if encrypted {
            if let Some(passphrase) = self.passphrase {
                params.push(("encryption_password", passphrase));
            }
        }
        let body = self.transport.get(endpoint, &params)?;
        serde_json::from_str(&body).map_err(|e| TransportError::Malformed {
            url: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Forms visible to the token. Only the `Medical` folder when it exists,
    /// otherwise every folder in name order.
    pub fn list_forms(&self) -> Result<Vec<FormRef>, TransportError> {
        let mut listing: FolderedForms = self.query("form.json", &[("folders", "1")], false)?;
        if let Some(medical) = listing.forms.remove(MEDICAL_FOLDER) {
            return Ok(medical);
        }
        Ok(listing.forms.into_values().flatten().collect())
    }

    pub fn form(&self, form_id: &str) -> Result<FormRef, TransportError> {
        self.query(&format!("form/{form_id}.json"), &[], false)
    }

    pub fn fields(&self, form_id: &str) -> Result<Vec<FieldDef>, TransportError> {
        let list: FieldList = self.query(&format!("form/{form_id}/field.json"), &[], true)?;
        Ok(match list {
            FieldList::Bare(fields) | FieldList::Wrapped { fields } => fields,
        })
    }

    /// Every submission id of `form`, oldest first.
    pub fn submission_ids(&self, form: &FormRef) -> Result<Vec<SubmissionId>, TransportError> {
        let endpoint = format!("form/{}/submission.json", form.id);
        let per_page = PAGE_SIZE.to_string();
        let mut ids = Vec::with_capacity(usize::try_from(form.submissions).unwrap_or(0));
        for page in 1..=page_count(form.submissions) {
            let page = page.to_string();
            let listing: SubmissionPage = self.query(
                &endpoint,
                &[("page", page.as_str()), ("per_page", per_page.as_str()), ("sort", "ASC")],
                true,
            )?;
            ids.extend(listing.submissions.into_iter().map(|s| s.id));
        }
        tracing::info!(form = %form.id, total = ids.len(), "listed submissions");
        Ok(ids)
    }

    pub fn submission(&self, id: &SubmissionId) -> Result<Submission, TransportError> {
        self.query(&format!("submission/{id}.json"), &[], true)
    }
}
