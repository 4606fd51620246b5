//! Cell identifier assignment.
//!
//! # Responsibility
//! - Give every cell a non-empty, globally unique `id`.
//!
//! # Invariants
//! - Existing non-empty ids are never altered.
//! - Cell order is preserved.
//! - Running twice on the same notebook changes nothing the second time.

use crate::model::notebook::{Notebook, SUPPORTED_NBFORMAT};
use log::debug;
use uuid::Uuid;

/// First notebook minor version whose schema allows cell ids.
pub const CELL_ID_MIN_NBFORMAT_MINOR: u32 = 5;

/// Assigns a fresh UUIDv4 id to each cell with a missing or empty id.
///
/// When any id was added to a format-4 notebook older than 4.5, the declared
/// minor version is raised so the ids stay schema-valid.
///
/// Returns whether the notebook changed.
pub fn ensure_cell_ids(notebook: &mut Notebook) -> bool {
    let mut assigned = 0usize;
    for cell in notebook.cells.iter_mut().filter(|cell| !cell.has_id()) {
        cell.id = Some(Uuid::new_v4().to_string());
        assigned += 1;
    }

    if assigned == 0 {
        return false;
    }

    if notebook.nbformat == SUPPORTED_NBFORMAT
        && notebook.nbformat_minor < CELL_ID_MIN_NBFORMAT_MINOR
    {
        notebook.nbformat_minor = CELL_ID_MIN_NBFORMAT_MINOR;
    }
    debug!("event=cell_ids_assigned module=service status=ok count={assigned}");
    true
}
