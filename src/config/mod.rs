//! Configuration management.
//!
//! This module resolves where local state lives and loads user settings.
//!
//! # Layout
//!
//! Everything lives under `~/.hybrid-todo/`:
//! - `data/local-storage.db`: the key-value store holding local changes
//! - `config.json`: optional user settings
//!
//! Resolution priority everywhere is: CLI flag > environment variable >
//! config file > built-in default.

mod settings;

pub use settings::{
    load_settings, save_settings, ResolvedSettings, Settings, DEFAULT_FETCH_LIMIT, SETTING_KEYS,
};

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// Get the global Hybrid Todo directory (`~/.hybrid-todo/`).
#[must_use]
pub fn global_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".hybrid-todo"))
}

/// Resolve the local store path.
///
/// Priority:
/// 1. `explicit_path` (the `--store` flag, which clap also fills from
///    `HTODO_STORE`)
/// 2. `HTODO_STORE` environment variable
/// 3. `~/.hybrid-todo/data/local-storage.db`
#[must_use]
pub fn resolve_store_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("HTODO_STORE") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    global_dir().map(|dir| dir.join("data").join("local-storage.db"))
}

/// Resolve the settings file path.
///
/// `HTODO_CONFIG` overrides the default `~/.hybrid-todo/config.json`.
///
/// # Errors
///
/// Returns `Error::Config` if no home directory can be determined.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("HTODO_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    global_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

/// Load settings and apply overrides and defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but is unreadable.
pub fn resolve_settings(endpoint_override: Option<&str>) -> Result<ResolvedSettings> {
    let settings = load_settings(&config_path()?)?;
    Ok(settings.resolve(endpoint_override))
}
