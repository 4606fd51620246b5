//! Notebook storage abstractions and filesystem implementation.
//!
//! # Responsibility
//! - Define the load/save contract used by the fix pipeline.
//! - Keep file IO and directory walking out of the service layer.
//!
//! # Invariants
//! - Read failures surface as `StoreError`, never as panics.

pub mod notebook_repo;
