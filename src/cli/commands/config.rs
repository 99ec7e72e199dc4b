//! Config command implementation.

use crate::cli::ConfigCommands;
use crate::config::{config_path, load_settings, resolve_store_path, save_settings, Settings};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ShowOutput {
    config_path: String,
    store_path: Option<String>,
    saved: Settings,
    effective: crate::config::ResolvedSettings,
}

/// Execute config commands.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written, or a
/// setting is invalid.
pub fn execute(
    command: &ConfigCommands,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    let path = config_path()?;

    match command {
        ConfigCommands::Show => {
            let saved = load_settings(&path)?;
            let effective = saved.resolve(endpoint);
            let store = resolve_store_path(store_path.map(PathBuf::as_path))
                .map(|p| p.display().to_string());

            if json {
                let output = ShowOutput {
                    config_path: path.display().to_string(),
                    store_path: store,
                    saved,
                    effective,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Config file:  {}", path.display());
                println!("Local store:  {}", store.as_deref().unwrap_or("(unknown)"));
                println!();
                println!("endpoint      {}", effective.endpoint);
                println!("fetch_limit   {}", effective.fetch_limit);
                println!("per_page      {}", effective.per_page);
                println!("timeout_secs  {}", effective.timeout_secs);
            }
        }
        ConfigCommands::Set { key, value } => {
            let mut settings = load_settings(&path)?;
            settings.set(key, value)?;
            save_settings(&path, &settings)?;

            if json {
                println!("{}", serde_json::json!({ "key": key, "value": value, "saved": true }));
            } else {
                println!("Set {key} = {value}");
            }
        }
        ConfigCommands::Reset => {
            save_settings(&path, &Settings::default())?;

            if json {
                println!("{}", serde_json::json!({ "reset": true }));
            } else {
                println!("Settings reset to defaults.");
            }
        }
    }

    Ok(())
}
