//! User settings.
//!
//! Loads and saves settings from `~/.hybrid-todo/config.json`. Every
//! field is optional; unset fields fall back to built-in defaults.

use crate::error::{Error, Result};
use crate::model::DEFAULT_PER_PAGE;
use crate::remote::dummyjson::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of todos requested per fetch. The remote cannot filter by
/// status, so one generous snapshot is fetched and filtered locally.
pub const DEFAULT_FETCH_LIMIT: usize = 150;

/// Keys accepted by `config set`.
pub const SETTING_KEYS: [&str; 4] = ["endpoint", "fetch_limit", "per_page", "timeout_secs"];

/// Settings stored in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Settings with every default applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSettings {
    pub endpoint: String,
    pub fetch_limit: usize,
    pub per_page: usize,
    pub timeout_secs: u64,
}

impl Settings {
    /// Apply an override endpoint (flag or env) and built-in defaults.
    #[must_use]
    pub fn resolve(&self, endpoint_override: Option<&str>) -> ResolvedSettings {
        let endpoint = endpoint_override
            .filter(|e| !e.trim().is_empty())
            .map(ToString::to_string)
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        ResolvedSettings {
            endpoint,
            fetch_limit: self.fetch_limit.unwrap_or(DEFAULT_FETCH_LIMIT),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set one setting from its string form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for an unknown key or a value
    /// that is not a positive number where one is required.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "endpoint" => {
                let value = value.trim();
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(Error::InvalidArgument(format!(
                        "endpoint must be an http(s) URL, got '{value}'"
                    )));
                }
                self.endpoint = Some(value.to_string());
            }
            "fetch_limit" => self.fetch_limit = Some(parse_positive(key, value)?),
            "per_page" => self.per_page = Some(parse_positive(key, value)?),
            "timeout_secs" => self.timeout_secs = Some(parse_positive(key, value)? as u64),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unknown config key '{other}'"
                )));
            }
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            Error::InvalidArgument(format!("{key} must be a positive integer, got '{value}'"))
        })
}

/// Load settings from `path`. A missing file yields defaults.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save settings to `path`, creating parent directories.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be written.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let resolved = Settings::default().resolve(None);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.fetch_limit, 150);
        assert_eq!(resolved.per_page, 10);
        assert_eq!(resolved.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_override_beats_file() {
        let settings = Settings {
            endpoint: Some("http://from-file".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.resolve(None).endpoint, "http://from-file");
        assert_eq!(
            settings.resolve(Some("http://from-flag")).endpoint,
            "http://from-flag"
        );
        assert_eq!(settings.resolve(Some("  ")).endpoint, "http://from-file");
    }

    #[test]
    fn test_set_validates() {
        let mut settings = Settings::default();
        settings.set("per_page", "5").unwrap();
        settings.set("endpoint", "http://localhost:3001").unwrap();
        assert_eq!(settings.per_page, Some(5));

        assert!(settings.set("per_page", "0").is_err());
        assert!(settings.set("fetch_limit", "lots").is_err());
        assert!(settings.set("endpoint", "ftp://nope").is_err());
        assert!(settings.set("colour", "blue").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");

        assert_eq!(load_settings(&path).unwrap(), Settings::default());

        let settings = Settings {
            fetch_limit: Some(30),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_settings(&path), Err(Error::Config(_))));
    }
}
