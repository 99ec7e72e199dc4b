//! Remote source trait.

use crate::error::Result;
use crate::model::Item;

/// A read-only provider of todo snapshots.
///
/// One call is one network read: no retries, no caching.
pub trait RemoteSource: Send + Sync {
    /// Human-readable location of the source, for logs and output.
    fn describe(&self) -> String;

    /// Fetch up to `limit` todos starting at `offset`.
    fn fetch_snapshot(
        &self,
        offset: usize,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Item>>> + Send;
}
