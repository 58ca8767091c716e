//! Compile command implementation

use super::output::{self, OutputFormat};
use super::request::{Overrides, Request};
use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Configuration for compile command
pub struct CompileConfig {
    pub file: PathBuf,
    pub format: OutputFormat,
    pub overrides: Overrides,
    pub output_file: Option<PathBuf>,
}

/// Compile a request file and print `{ text, parameters, injectors }`
pub fn compile(config: CompileConfig) -> Result<()> {
    let mut request = Request::from_file(&config.file)?;
    request.apply(&config.overrides);

    let query = request.compile()?;
    info!(
        "{}: {} parameter(s), {} mode",
        config.file.display(),
        query.parameters.values().len(),
        query.parameters.mode()
    );

    let content = output::format_json(&query, config.format)?;
    output::write_output(&content, config.output_file.as_deref())
}
