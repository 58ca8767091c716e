//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use jpql_criteria_diagnostics::CompileError;
use serde::Serialize;
use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    #[default]
    Pretty,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stderr().is_terminal()),
    }
}

fn compile_error(error: &anyhow::Error) -> Option<&CompileError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CompileError>())
}

/// Format an error for display
///
/// Compile errors anywhere in the chain are rendered as diagnostics.
pub fn format_error(error: &anyhow::Error) -> String {
    let diagnostic = compile_error(error).map(|e| e.to_diagnostic().render());
    match diagnostic {
        Some(rendered) => format!("{} {}\n{}", "Error:".red().bold(), error, rendered),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Process exit code for a failed command
///
/// 2 when the compiler rejects the request itself, 3 for configuration
/// errors, 1 for anything else (I/O, malformed JSON).
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match compile_error(error).map(CompileError::code) {
        Some(code) if code.is_config_error() => 3,
        Some(code)
            if code.is_tree_error() || code.is_binding_error() || code.is_placeholder_error() =>
        {
            2
        }
        _ => 1,
    }
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Serialize `value` as JSON
pub fn format_json<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let json = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    };
    json.context("Failed to serialize JSON")
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}
