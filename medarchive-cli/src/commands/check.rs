//! `medarchive check`: who registered but has no archived form.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use medarchive_core::Settings;
use medarchive_sync::{check, CrossCheckReport, HttpTransport};

/// Cross-check an archive against website registrations.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Archive directory containing `state.json`.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Program website username.
    #[arg(long, env = "MEDARCHIVE_USERNAME")]
    pub username: String,

    /// Program website password.
    #[arg(long, env = "MEDARCHIVE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "student")]
    name: String,
}

impl CheckArgs {
    pub fn run(self, settings: Settings) -> Result<()> {
        let transport = HttpTransport::from_settings(&settings);
        let report = check(&self.dir, &settings, &transport, &self.username, &self.password)?;
        print_report(&report);
        Ok(())
    }
}

fn print_list(title: &str, names: &[String]) {
    println!("{}", format!("{title} ({}):", names.len()).bold());
    if names.is_empty() {
        return;
    }
    let rows: Vec<StudentRow> = names.iter().map(|name| StudentRow { name: name.clone() }).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn print_report(report: &CrossCheckReport) {
    println!("Program: {}", report.program);
    println!();
    print_list("Students with a Missing Medical Form", &report.missing);
    println!();
    print_list("Students with a Bypass", &report.bypassed);
    println!();
    println!("{}", "Check Complete!".green());
}
