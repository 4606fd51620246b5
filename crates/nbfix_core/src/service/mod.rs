//! Use-case services over the notebook model.
//!
//! # Responsibility
//! - Assign cell ids and orchestrate the per-notebook fix pipeline.
//! - Keep storage access behind `NotebookRepository`.
//!
//! # Invariants
//! - No state is carried from one notebook to the next.

pub mod cell_ids;
pub mod fix_service;
