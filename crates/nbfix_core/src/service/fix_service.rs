//! Notebook fix pipeline and batch driver.
//!
//! # Responsibility
//! - Run load -> cell ids -> front matter -> save for one notebook.
//! - Drive the pipeline over every notebook discovered under a root.
//!
//! # Invariants
//! - A notebook is written only when the pipeline changed it.
//! - Per-notebook failures never abort the batch.
//! - Notebooks are processed one at a time, in discovery order.
//!
//! # See also
//! - repo/notebook_repo.rs for the load/save contract.

use crate::frontmatter::normalize_first_cell;
use crate::model::notebook::Notebook;
use crate::repo::notebook_repo::{discover_notebooks, NotebookRepository, StoreError};
use crate::service::cell_ids::ensure_cell_ids;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Directory scanned when no root is given.
pub const DEFAULT_ROOT: &str = "_notebooks";
/// File extension (without dot) of notebook documents.
pub const DEFAULT_EXTENSION: &str = "ipynb";

/// Where the batch driver looks for notebooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub root: PathBuf,
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl BatchConfig {
    /// Creates a config for `root` with the default extension.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Behaviour switches for the fix pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixOptions {
    /// Compute changes but never write them.
    pub dry_run: bool,
}

/// Result of running the pipeline on one notebook.
#[derive(Debug)]
pub enum FixOutcome {
    /// Nothing to change; file untouched.
    Unchanged,
    /// Changes were written back.
    Normalized,
    /// Changes were found but `dry_run` suppressed the write.
    WouldNormalize,
    /// The notebook could not be read; nothing was attempted.
    Skipped(StoreError),
    /// Changes were found but writing them failed.
    WriteFailed(StoreError),
}

impl FixOutcome {
    /// Returns whether the pipeline found something to change.
    pub fn has_changes(&self) -> bool {
        matches!(
            self,
            Self::Normalized | Self::WouldNormalize | Self::WriteFailed(_)
        )
    }
}

/// One processed notebook in a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: FixOutcome,
}

/// Per-notebook outcomes of one batch run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn normalized(&self) -> usize {
        self.count(|outcome| matches!(outcome, FixOutcome::Normalized | FixOutcome::WouldNormalize))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|outcome| matches!(outcome, FixOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FixOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FixOutcome::WriteFailed(_)))
    }

    fn count(&self, predicate: impl Fn(&FixOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

/// Applies every in-memory fix to `notebook`.
///
/// Both steps always run; returns whether either changed the notebook.
pub fn normalize_notebook(notebook: &mut Notebook) -> bool {
    let ids_changed = ensure_cell_ids(notebook);
    let front_matter_changed = normalize_first_cell(notebook);
    ids_changed || front_matter_changed
}

/// Fix pipeline facade over a notebook repository.
pub struct NotebookFixService<R: NotebookRepository> {
    repo: R,
    options: FixOptions,
}

impl<R: NotebookRepository> NotebookFixService<R> {
    /// Creates a service that writes changes back.
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, FixOptions::default())
    }

    pub fn with_options(repo: R, options: FixOptions) -> Self {
        Self { repo, options }
    }

    /// Runs the pipeline on one notebook path.
    ///
    /// # Side effects
    /// - Overwrites `path` when changes were found and `dry_run` is off.
    /// - Emits `notebook_fix` logging events.
    pub fn fix_notebook(&self, path: &Path) -> FixOutcome {
        let started_at = Instant::now();

        let mut notebook = match self.repo.load(path) {
            Ok(notebook) => notebook,
            Err(err) => {
                debug!(
                    "event=notebook_fix module=service status=skip path={} error={}",
                    path.display(),
                    err
                );
                return FixOutcome::Skipped(err);
            }
        };

        if !normalize_notebook(&mut notebook) {
            debug!(
                "event=notebook_fix module=service status=ok changed=false path={}",
                path.display()
            );
            return FixOutcome::Unchanged;
        }

        if self.options.dry_run {
            info!(
                "event=notebook_fix module=service status=ok changed=true dry_run=true path={}",
                path.display()
            );
            return FixOutcome::WouldNormalize;
        }

        match self.repo.save(path, &notebook) {
            Ok(()) => {
                info!(
                    "event=notebook_fix module=service status=ok changed=true path={} duration_ms={}",
                    path.display(),
                    started_at.elapsed().as_millis()
                );
                FixOutcome::Normalized
            }
            Err(err) => {
                error!(
                    "event=notebook_fix module=service status=error error_code=write_failed path={} duration_ms={} error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                FixOutcome::WriteFailed(err)
            }
        }
    }

    /// Discovers notebooks under `config.root` and fixes each in turn.
    pub fn run_batch(&self, config: &BatchConfig) -> BatchReport {
        self.run_batch_with(config, |_, _| {})
    }

    /// Like [`Self::run_batch`], calling `on_outcome` right after each notebook.
    pub fn run_batch_with(
        &self,
        config: &BatchConfig,
        mut on_outcome: impl FnMut(&Path, &FixOutcome),
    ) -> BatchReport {
        let started_at = Instant::now();
        info!(
            "event=batch_run module=service status=start root={} extension={} dry_run={}",
            config.root.display(),
            config.extension,
            self.options.dry_run
        );

        let mut report = BatchReport::default();
        for path in discover_notebooks(&config.root, &config.extension) {
            let outcome = self.fix_notebook(&path);
            on_outcome(&path, &outcome);
            report.entries.push(BatchEntry { path, outcome });
        }

        info!(
            "event=batch_run module=service status=ok total={} normalized={} unchanged={} skipped={} failed={} duration_ms={}",
            report.entries.len(),
            report.normalized(),
            report.unchanged(),
            report.skipped(),
            report.failed(),
            started_at.elapsed().as_millis()
        );
        report
    }
}
