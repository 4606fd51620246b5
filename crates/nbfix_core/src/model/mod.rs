//! Notebook document model.
//!
//! # Responsibility
//! - Define the in-memory tree that the fix pipeline mutates.
//!
//! # Invariants
//! - One `Notebook` value maps to exactly one file on disk.
//! - Nothing in the model is shared across documents.

pub mod notebook;
