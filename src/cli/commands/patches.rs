//! Patches command: inspect the local change set.

use crate::error::Result;
use crate::model::PatchMap;
use crate::storage::{PatchStats, STORAGE_KEY};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::open_patch_store;

#[derive(Serialize)]
struct PatchesOutput {
    key: &'static str,
    stats: PatchStats,
    updated_at: Option<String>,
    patches: PatchMap,
}

/// Print the raw patch map with a summary.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn execute(store_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_patch_store(store_path)?;
    let patches = store.get_all_patches();
    let stats = store.stats();
    let updated_at = store
        .backend()
        .updated_at(STORAGE_KEY)?
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|ts| ts.to_rfc3339());

    if json {
        let output = PatchesOutput {
            key: STORAGE_KEY,
            stats,
            updated_at,
            patches,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if patches.is_empty() {
        println!("No local changes.");
        return Ok(());
    }

    println!("{}", "Local Changes".bold().underline());
    println!();
    println!("  Edited:  {}", stats.edited);
    println!("  Deleted: {}", stats.deleted);
    println!("  Created: {}", stats.created);
    if let Some(ts) = updated_at {
        println!("  Updated: {ts}");
    }
    println!();

    for (id, patch) in &patches {
        let entry = serde_json::to_string(patch)?;
        if patch.is_deleted() {
            println!("{:>6}  {}", id, entry.red());
        } else {
            println!("{id:>6}  {entry}");
        }
    }

    Ok(())
}
