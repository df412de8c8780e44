//! Failure paths of the `medarchive` binary that never reach the network.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn medarchive_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("medarchive"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env("MEDARCHIVE_TOKEN", "token")
        .env_remove("MEDARCHIVE_PASSPHRASE")
        .env("RUST_LOG", "warn")
        .current_dir(config_home);
    cmd
}

fn write_template(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("template.tex");
    fs::write(&path, "[[full_legal_name]] v[[version]]").expect("template");
    path
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    medarchive_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("complete").and(contains("update")).and(contains("check")));
}

#[test]
fn update_on_empty_directory_fails_without_writing_state() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let template = write_template(home.path());

    medarchive_cmd(home.path())
        .args(["update", "--dir"])
        .arg(archive.path())
        .arg("--template")
        .arg(&template)
        .assert()
        .code(1)
        .stderr(contains("ConfigurationError").and(contains("state.json")))
        .stderr(contains("Recover by running").not());

    assert!(!archive.path().join("state.json").exists());
}

#[test]
fn complete_refuses_non_empty_directory() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    fs::write(archive.path().join("old.pdf"), "x").unwrap();
    let template = write_template(home.path());

    medarchive_cmd(home.path())
        .args(["complete", "--form", "1772", "--dir"])
        .arg(archive.path())
        .arg("--template")
        .arg(&template)
        .assert()
        .code(1)
        .stderr(contains("not empty"));

    let entries: Vec<_> = fs::read_dir(archive.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn missing_template_is_reported() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();

    medarchive_cmd(home.path())
        .args(["complete", "--form", "1772", "--dir"])
        .arg(archive.path())
        .args(["--template", "no-such-template.tex"])
        .assert()
        .code(1)
        .stderr(contains("ConfigurationError").and(contains("no-such-template.tex")));
}

#[test]
fn token_is_required() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();

    medarchive_cmd(home.path())
        .env_remove("MEDARCHIVE_TOKEN")
        .args(["update", "--dir"])
        .arg(archive.path())
        .assert()
        .failure()
        .stderr(contains("--token"));
}

#[test]
fn check_requires_existing_archive() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();

    medarchive_cmd(home.path())
        .args(["check", "--username", "chair", "--password", "pw", "--dir"])
        .arg(archive.path())
        .assert()
        .code(1)
        .stderr(contains("ConfigurationError"));
}

#[test]
fn invalid_settings_file_is_rejected() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let settings = home.path().join("settings.yaml");
    fs::write(&settings, "checkpoint_every: [not, a, number]\n").unwrap();

    medarchive_cmd(home.path())
        .arg("--settings")
        .arg(&settings)
        .args(["update", "--dir"])
        .arg(archive.path())
        .assert()
        .code(1)
        .stderr(contains("invalid settings"));
}

#[test]
fn corrupt_state_is_a_state_error() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    fs::write(archive.path().join("state.json"), "{ truncated").unwrap();
    let template = write_template(home.path());

    medarchive_cmd(home.path())
        .args(["update", "--dir"])
        .arg(archive.path())
        .arg("--template")
        .arg(&template)
        .assert()
        .code(1)
        .stderr(contains("StateError"));
    assert_eq!(fs::read_to_string(archive.path().join("state.json")).unwrap(), "{ truncated");
}
