//! Command-line entry point for the notebook fixer.
//!
//! # Responsibility
//! - Map arguments to a `BatchConfig` and run one batch.
//! - Print one line per written (or failed) notebook.
//!
//! # Invariants
//! - Per-notebook failures never change the exit code.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use nbfix_core::service::fix_service::{DEFAULT_EXTENSION, DEFAULT_ROOT};
use nbfix_core::{
    init_logging, BatchConfig, FixOptions, FixOutcome, FsNotebookRepository, LogLevel,
    NotebookFixService,
};

#[derive(Parser)]
#[command(
    name = "nbfix",
    version,
    about = "Normalize notebook front matter and cell ids in place"
)]
struct Cli {
    /// Directory searched recursively for notebooks
    #[arg(default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Notebook file extension, without the dot
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Log level: trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, value_parser = parse_log_level, requires = "log_dir")]
    log_level: Option<LogLevel>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).map_err(|err| err.to_string())
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.unwrap_or_else(LogLevel::default_for_build);
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }

    let config = BatchConfig {
        root: cli.root,
        extension: cli.extension,
    };
    let service = NotebookFixService::with_options(
        FsNotebookRepository::new(),
        FixOptions {
            dry_run: cli.dry_run,
        },
    );

    service.run_batch_with(&config, |path, outcome| match outcome {
        FixOutcome::Normalized => println!("Normalized: {}", path.display()),
        FixOutcome::WouldNormalize => println!("Would normalize: {}", path.display()),
        FixOutcome::WriteFailed(err) => println!("Failed to write {}: {err}", path.display()),
        FixOutcome::Unchanged | FixOutcome::Skipped(_) => {}
    });
}
