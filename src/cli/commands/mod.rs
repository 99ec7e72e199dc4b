//! Command implementations.
//!
//! Shared plumbing for opening the local store and building a
//! controller lives here; each command gets its own module.

pub mod completions;
pub mod config;
pub mod list;
pub mod patches;
pub mod reset;
pub mod todo;
pub mod version;

use crate::cli::ViewArgs;
use crate::config::{resolve_settings, resolve_store_path, ResolvedSettings};
use crate::controller::TodoController;
use crate::error::{Error, Result};
use crate::model::{PageQuery, StatusFilter, DEFAULT_PAGE};
use crate::remote::DummyJsonSource;
use crate::storage::{PatchStore, SqliteStore};
use crate::validate::normalize_status;
use std::path::PathBuf;

/// Controller type used by every command.
pub type CliController = TodoController<DummyJsonSource, SqliteStore>;

/// Open the patch store at the resolved location.
///
/// # Errors
///
/// Returns an error if no location can be resolved or the store cannot
/// be opened.
pub fn open_patch_store(store_path: Option<&PathBuf>) -> Result<PatchStore<SqliteStore>> {
    let path = resolve_store_path(store_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine local store location".into()))?;
    tracing::debug!(path = %path.display(), "Opening local store");
    Ok(PatchStore::new(SqliteStore::open(&path)?))
}

/// Build the page query from view flags and settings.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` for an unknown status name.
pub fn build_query(view: &ViewArgs, settings: &ResolvedSettings) -> Result<PageQuery> {
    let status = match view.status.as_deref() {
        Some(raw) => normalize_status(raw)?,
        None => StatusFilter::All,
    };
    Ok(PageQuery::new(
        view.page.unwrap_or(DEFAULT_PAGE),
        view.per_page.unwrap_or(settings.per_page),
        status,
    ))
}

/// Build a controller for the resolved endpoint and store.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the store cannot
/// be opened.
pub fn build_controller(
    view: &ViewArgs,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
) -> Result<CliController> {
    let settings = resolve_settings(endpoint)?;
    let query = build_query(view, &settings)?;
    let remote = DummyJsonSource::with_config(settings.endpoint.clone(), settings.timeout_secs);
    let patches = open_patch_store(store_path)?;

    Ok(TodoController::new(remote, patches, query).with_fetch_limit(settings.fetch_limit))
}

/// Create the async runtime for commands that touch the network.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}
