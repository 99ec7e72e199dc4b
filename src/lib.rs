//! Hybrid Todo - DummyJSON todos with changes that stick
//!
//! This crate provides the core functionality for the `htodo` CLI tool.
//! Todos are read from a remote API that never persists writes; every
//! create, edit, toggle and delete is recorded as a local patch and
//! replayed over each fresh remote snapshot.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Item, Patch, PageQuery)
//! - [`storage`] - Key-value stores and the patch store
//! - [`remote`] - Read-only remote todo source
//! - [`overlay`] - Merging patches over a remote snapshot
//! - [`paginate`] - Status filtering and paging
//! - [`controller`] - Load, mutate and navigate the todo list
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod overlay;
pub mod paginate;
pub mod remote;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};

/// Global silent mode flag for `--silent` output.
///
/// When set, mutate commands print only the todo ID.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Escape a value for CSV output (quoted when it holds a comma, quote or newline).
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
