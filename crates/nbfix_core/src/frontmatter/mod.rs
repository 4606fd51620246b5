//! Front-matter detection and normalization for a notebook's first cell.
//!
//! # Responsibility
//! - Decide whether the first cell opens with a YAML-like metadata block.
//! - Rewrite recognized `key: value` lines so a YAML parser accepts them.
//!
//! # Invariants
//! - Lines that do not match `key: value` are never modified.
//! - Only the detected region is rewritten; the rest of the source is kept.
//! - Rewriting an already-normalized block yields the same text.

mod block;
mod lines;
mod quote;

pub use block::{
    has_front_matter, normalize_first_cell, normalize_front_matter_source, HEAD_SCAN_LINES,
    TITLE_SCAN_LINES,
};
pub use lines::{coerce_comments_flag, normalize_front_matter_line, normalize_front_matter_lines};
pub use quote::quote_value;
