//! Reset command implementation.

use crate::cli::ViewArgs;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::{build_controller, open_patch_store, runtime};

#[derive(Serialize)]
struct ResetOutput {
    cleared: usize,
    reloaded: usize,
}

/// Discard every local change and reload the original data.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` without `--yes`, or the fetch error
/// if the reload fails (local changes are already gone by then).
pub fn execute(
    yes: bool,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    if !yes {
        return Err(Error::InvalidArgument(
            "reset discards all local changes; pass --yes to confirm".to_string(),
        ));
    }

    let cleared = open_patch_store(store_path)?.stats().total();
    let mut controller = build_controller(&ViewArgs::default(), store_path, endpoint)?;
    runtime()?.block_on(controller.reset())?;
    let reloaded = controller.all_items().len();

    if json {
        let output = ResetOutput { cleared, reloaded };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Cleared {cleared} local change(s); reloaded {reloaded} todos.");
    }

    Ok(())
}
