//! Field resolution: logical field names → remote field ids → values.
//!
//! A logical name may be backed by several remote fields (e.g. "date of last
//! tetanus booster" and a "never had one" alternate). Values are resolved
//! first-non-empty-wins over the id list, in form order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigurationError, ResolveError};
use crate::types::{FieldDef, Submission};

/// Logical names every form must define. The document template references
/// these as `[[name]]` placeholders.
pub const REQUIRED_FIELDS: &[&str] = &[
    "esp_username",
    "esp_id_number",
    "full_legal_name",
    "birthdate",
    "cell_phone_number",
    "home_address",
    "parentguardian_no_1",
    "parentguardian_no_2",
    "emergency_contact",
    "chronic_medical_conditions_requiring_ongoing_care",
    "allergies_animals_latex_food_meds_other",
    "prescription_medicines_used_regularly_or_needed_on_occasion",
    "any_other_health_issues_that_mit_andor_esp_should_be_aware_of",
    "date_of_last_tetanus_booster",
    "physician_name",
    "physician_phone",
    "name_of_health_insurance_company",
    "primary_subscriber",
    "policy_number",
];

/// Logical field name → remote field ids, in the order the form lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, Vec<String>>);

impl FieldMap {
    /// Build the map from a form's field definitions and check that every
    /// `required` name is present.
    ///
    /// Unnamed fields (section headers, descriptive text) are skipped. A name
    /// seen twice keeps both ids.
    pub fn build(defs: &[FieldDef], required: &[&str]) -> Result<Self, ConfigurationError> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for def in defs {
            if def.name.is_empty() {
                continue;
            }
            map.entry(def.name.clone()).or_default().push(def.id.clone());
        }

        if let Some(missing) = required.iter().find(|name| !map.contains_key(**name)) {
            return Err(ConfigurationError::MissingField {
                name: (*missing).to_string(),
            });
        }
        Ok(FieldMap(map))
    }

    /// Remote ids backing `name`, if the form defines it.
    pub fn ids(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// All logical names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve every logical name against `submission`.
    ///
    /// Fails on the first name none of whose ids appear in the submission.
    pub fn resolve(&self, submission: &Submission) -> Result<BTreeMap<String, String>, ResolveError> {
        self.0
            .iter()
            .map(|(name, ids)| {
                resolve_first_non_empty(name, ids, submission).map(|value| (name.clone(), value))
            })
            .collect()
    }
}

/// Value of `field_id` in `submission`, or `None` if the field is absent.
///
/// `null`, `true` and `false` read as the empty string. Numbers are rendered
/// in decimal and compound values as compact JSON.
pub fn lookup_value(submission: &Submission, field_id: &str) -> Option<String> {
    submission
        .data
        .iter()
        .find(|item| item.field == field_id)
        .map(|item| value_text(&item.value))
}

/// First non-empty value among `ids`.
///
/// If at least one id is present but all present values are empty, the empty
/// string is returned. Only when no id is present at all does this fail.
pub fn resolve_first_non_empty(
    name: &str,
    ids: &[String],
    submission: &Submission,
) -> Result<String, ResolveError> {
    let mut last_present = None;
    for id in ids {
        if let Some(value) = lookup_value(submission, id) {
            if !value.is_empty() {
                return Ok(value);
            }
            last_present = Some(value);
        }
    }
    last_present.ok_or_else(|| ResolveError::FieldNotFound {
        field: name.to_string(),
        ids: ids.to_vec(),
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(_) => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        compound => compound.to_string(),
    }
}
