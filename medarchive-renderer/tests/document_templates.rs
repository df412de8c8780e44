use std::collections::BTreeMap;

use medarchive_core::REQUIRED_FIELDS;
use medarchive_renderer::{
    artifact_base_name, format_long_date, identity_line, sanitize_filename, DocumentValues,
};

fn template() -> String {
    let mut tpl = String::from("\\documentclass{article}\n\\begin{document}\n");
    tpl.push_str("Version [[version]] submitted [[formatted_date]]\n");
    for name in REQUIRED_FIELDS {
        tpl.push_str(&format!("{name}: [[{name}]]\\\\\n"));
    }
    tpl.push_str("[[not_a_field]]\n\\end{document}\n");
    tpl
}

fn resolved() -> BTreeMap<String, String> {
    REQUIRED_FIELDS
        .iter()
        .map(|name| (name.to_string(), format!("value_of {name}")))
        .collect()
}

#[test]
fn full_template_interpolates_every_required_field() {
    let date = format_long_date("2014-11-02 08:15:00").expect("date");
    let values = DocumentValues::new(&resolved(), 3, &date);
    let text = values.interpolate(&template());

    for name in REQUIRED_FIELDS {
        assert!(
            !text.contains(&format!("[[{name}]]")),
            "placeholder for {name} left in output"
        );
    }
    assert!(text.contains("Version 3 submitted November 02, 2014"));
    assert!(text.contains(r"value\_of esp\_username"), "values must be LaTeX-escaped");
    assert!(text.contains("[[not_a_field]]"), "unknown placeholders stay as-is");
}

#[test]
fn artifact_names_from_identity() {
    let identity = identity_line("4411", "Jane O'Brien; 2024", "jobrien");
    assert_eq!(artifact_base_name(&identity, 1), "4411 - Jane OBrien 2024 - jobrien (v1)");
}

#[test]
fn sanitize_allow_list() {
    let allowed = sanitize_filename("aZ09-_.() !@#$%^&*+=[]{};:'\",<>/?\\|`~");
    assert_eq!(allowed, "aZ09-_.() ");
}
