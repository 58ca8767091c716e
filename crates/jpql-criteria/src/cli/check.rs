//! Check command implementation

use super::output;
use super::request::{Overrides, Request};
use anyhow::{Result, bail};
use colored::Colorize;
use jpql_criteria_compiler::BindingMode;
use std::path::{Path, PathBuf};

/// Configuration for check command
pub struct CheckConfig {
    pub files: Vec<PathBuf>,
    pub overrides: Overrides,
}

/// What a request would compile to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub mode: BindingMode,
    pub parameters: usize,
    pub injectors: usize,
}

/// Compile one request file without printing it
pub fn check_file(path: &Path, overrides: &Overrides) -> Result<CheckReport> {
    let mut request = Request::from_file(path)?;
    request.apply(overrides);
    let query = request.compile()?;
    Ok(CheckReport {
        mode: query.parameters.mode(),
        parameters: query.parameters.values().len(),
        injectors: query.injectors.len(),
    })
}

/// Validate request files and report the binding mode of each
pub fn check(config: CheckConfig) -> Result<()> {
    if config.files.is_empty() {
        bail!("No files specified for checking");
    }

    let mut failures = 0;
    for file in &config.files {
        match check_file(file, &config.overrides) {
            Ok(report) => println!(
                "{} {} ({} mode, {} parameter(s), {} injector(s))",
                "✓".green().bold(),
                file.display(),
                report.mode,
                report.parameters,
                report.injectors
            ),
            Err(e) => {
                failures += 1;
                println!("{} {}", "✗".red().bold(), file.display());
                eprintln!("{}", output::format_error(&e));
            }
        }
    }

    println!();
    if failures > 0 {
        bail!("{} of {} request(s) failed", failures, config.files.len());
    }
    println!(
        "{}",
        output::format_success(&format!("{} request(s) compile", config.files.len()))
    );
    Ok(())
}
