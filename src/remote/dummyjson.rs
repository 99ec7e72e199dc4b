//! DummyJSON todo source.
//!
//! `GET {endpoint}/todos?limit=<n>&skip=<m>` returns
//! `{ "todos": [ {id, todo, completed, userId}, ... ], ... }`.

use crate::error::{Error, Result};
use crate::model::Item;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::source::RemoteSource;

/// Public DummyJSON endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://dummyjson.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// DummyJSON HTTP source.
pub struct DummyJsonSource {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl DummyJsonSource {
    /// Create a source for the public endpoint.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_ENDPOINT.to_string(), DEFAULT_TIMEOUT_SECS)
    }

    /// Create a source for a custom endpoint and timeout.
    pub fn with_config(endpoint: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Full URL for a snapshot request.
    #[must_use]
    pub fn todos_url(&self, offset: usize, limit: usize) -> String {
        format!("{}/todos?limit={limit}&skip={offset}", self.endpoint)
    }
}

impl Default for DummyJsonSource {
    fn default() -> Self {
        Self::new()
    }
}

/// DummyJSON list response. Pagination metadata is ignored.
#[derive(Debug, Deserialize)]
struct TodosResponse {
    #[serde(default)]
    todos: Vec<Item>,
}

/// Parse a DummyJSON list payload.
///
/// A payload without a `todos` array yields no items.
///
/// # Errors
///
/// Returns `Error::Fetch` if the body is not a valid payload.
pub fn parse_snapshot(body: &str) -> Result<Vec<Item>> {
    let response: TodosResponse = serde_json::from_str(body).map_err(|e| Error::Fetch {
        status: None,
        message: format!("malformed todo payload: {e}"),
    })?;
    Ok(response.todos)
}

impl RemoteSource for DummyJsonSource {
    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    async fn fetch_snapshot(&self, offset: usize, limit: usize) -> Result<Vec<Item>> {
        let url = self.todos_url(offset, limit);
        debug!(%url, "Fetching todo snapshot");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Fetch {
                status: None,
                message: format!("request to {} failed: {e}", self.endpoint),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .map_or_else(|| status.to_string(), ToString::to_string),
            });
        }

        let body = response.text().await.map_err(|e| Error::Fetch {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {e}"),
        })?;

        let items = parse_snapshot(&body)?;
        debug!(count = items.len(), "Fetched todo snapshot");
        Ok(items)
    }
}
