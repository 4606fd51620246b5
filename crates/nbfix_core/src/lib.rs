//! Core logic for normalizing notebooks before conversion.
//! This crate owns every rewrite rule; the CLI only wires arguments to it.

pub mod frontmatter;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use frontmatter::{
    has_front_matter, normalize_first_cell, normalize_front_matter_lines,
    normalize_front_matter_source, quote_value,
};
pub use logging::{init_logging, LogLevel, LoggingError};
pub use model::notebook::{Cell, CellSource, CellType, Notebook};
pub use repo::notebook_repo::{
    discover_notebooks, FsNotebookRepository, NotebookRepository, StoreError, StoreResult,
};
pub use service::cell_ids::ensure_cell_ids;
pub use service::fix_service::{
    normalize_notebook, BatchConfig, BatchEntry, BatchReport, FixOptions, FixOutcome,
    NotebookFixService,
};
