//! Notebook storage contracts and filesystem implementation.
//!
//! # Responsibility
//! - Load notebook files into the in-memory model and write them back.
//! - Discover notebook files under a root directory.
//!
//! # Invariants
//! - Only format-4 notebooks are accepted by `load`.
//! - `save` overwrites the target with the canonical JSON layout.
//! - File handles never outlive a single `load`/`save` call.

use crate::model::notebook::{Notebook, SUPPORTED_NBFORMAT};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for notebook load/save operations.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
    UnsupportedFormat(u32),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "invalid notebook json: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize notebook: {err}"),
            Self::UnsupportedFormat(major) => write!(
                f,
                "unsupported notebook format {major} (expected {SUPPORTED_NBFORMAT})"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Storage interface used by the fix pipeline.
pub trait NotebookRepository {
    fn load(&self, path: &Path) -> StoreResult<Notebook>;
    fn save(&self, path: &Path, notebook: &Notebook) -> StoreResult<()>;
}

/// Filesystem-backed notebook repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsNotebookRepository;

impl FsNotebookRepository {
    pub fn new() -> Self {
        Self
    }
}

impl NotebookRepository for FsNotebookRepository {
    fn load(&self, path: &Path) -> StoreResult<Notebook> {
        let text = fs::read_to_string(path)?;
        let notebook = Notebook::from_json_str(&text).map_err(StoreError::Parse)?;
        if notebook.nbformat != SUPPORTED_NBFORMAT {
            return Err(StoreError::UnsupportedFormat(notebook.nbformat));
        }
        Ok(notebook)
    }

    fn save(&self, path: &Path, notebook: &Notebook) -> StoreResult<()> {
        let text = notebook
            .to_canonical_json()
            .map_err(StoreError::Serialize)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Recursively lists files under `root` whose extension equals `extension`.
///
/// Hidden entries (name starting with `.`, e.g. `.ipynb_checkpoints`) below
/// the root are not visited. Siblings are visited in file-name order.
/// A missing root yields an empty list.
pub fn discover_notebooks(root: &Path, extension: &str) -> Vec<PathBuf> {
    if !root.is_dir() {
        warn!(
            "event=discover module=repo status=skip reason=root_missing root={}",
            root.display()
        );
        return Vec::new();
    }

    let paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("event=discover module=repo status=error error={err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some(extension))
        .map(DirEntry::into_path)
        .collect();

    debug!(
        "event=discover module=repo status=ok root={} count={}",
        root.display(),
        paths.len()
    );
    paths
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
