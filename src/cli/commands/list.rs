//! List command implementation.

use crate::cli::render::print_page;
use crate::cli::ViewArgs;
use crate::error::Result;
use std::path::PathBuf;

use super::{build_controller, runtime};

/// Fetch, merge and print one page of todos.
///
/// # Errors
///
/// Returns the fetch error if the remote cannot be read.
pub fn execute(
    view: &ViewArgs,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut controller = build_controller(view, store_path, endpoint)?;
    runtime()?.block_on(controller.refresh())?;
    print_page(&controller, json)
}
