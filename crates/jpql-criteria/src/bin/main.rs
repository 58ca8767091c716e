//! JPQL criteria command-line interface

use clap::{Parser, Subcommand};
use jpql_criteria::cli::check::{self, CheckConfig};
use jpql_criteria::cli::compile::{self, CompileConfig};
use jpql_criteria::cli::output::{self, OutputFormat};
use jpql_criteria::cli::request::Overrides;
use std::path::PathBuf;

/// JPQL criteria compiler
#[derive(Parser)]
#[command(name = "jpqlc")]
#[command(author, version, about = "Compile JPQL criteria trees into query text and bindings", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// Alias overriding the request configuration
    #[arg(long, global = true)]
    alias: Option<String>,

    /// Entity name overriding the request configuration
    #[arg(long, global = true)]
    entity: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a request file
    Compile {
        /// JSON request file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that request files compile and report their binding mode
    Check {
        /// JSON request files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let overrides = Overrides {
        alias: cli.alias,
        entity: cli.entity,
    };

    let result = match cli.command {
        Commands::Compile {
            file,
            format,
            output: output_file,
        } => compile::compile(CompileConfig {
            file,
            format,
            overrides,
            output_file,
        }),
        Commands::Check { files } => check::check(CheckConfig { files, overrides }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(output::exit_code(&e));
    }
}
