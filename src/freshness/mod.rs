//! Freshness detection for copied source files (mtime based).

pub mod mtime;

pub use mtime::{get_mtime, needs_copy};
