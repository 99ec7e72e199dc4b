//! Local patch store.
//!
//! Holds the overlay that makes local edits stick: a map from item id to
//! a [`Patch`], persisted as one JSON blob under [`STORAGE_KEY`].
//!
//! Reads never fail: an absent or corrupt blob is an empty map. Writes
//! never fail either: backend errors are logged and swallowed, and the
//! caller proceeds as if the write succeeded.

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::model::{Item, Patch, PatchMap};
use crate::storage::kv::KeyValueStore;

/// Key under which the patch map is persisted.
pub const STORAGE_KEY: &str = "dummyjson_todos_local_changes";

/// Summary of what the overlay currently changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatchStats {
    /// Remote items with field overrides (not deleted)
    pub edited: usize,
    /// Ids suppressed by a deletion marker (remote or synthetic)
    pub deleted: usize,
    /// Synthetic items still visible
    pub created: usize,
}

impl PatchStats {
    /// Total number of entries in the map.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.edited + self.deleted + self.created
    }
}

/// Patch store over an injected key-value backend.
#[derive(Debug)]
pub struct PatchStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> PatchStore<S> {
    /// Wrap a backend.
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Borrow the backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Give the backend back.
    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Current patch map; empty if absent or unreadable.
    pub fn get_all_patches(&self) -> PatchMap {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PatchMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read local changes, using none");
                return PatchMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(patches) => patches,
            Err(e) => {
                warn!(error = %e, "Failed to parse local changes, using none");
                PatchMap::new()
            }
        }
    }

    /// Overwrite the persisted map.
    pub fn save_all_patches(&mut self, patches: &PatchMap) {
        let json = match serde_json::to_string(patches) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize local changes");
                return;
            }
        };

        if let Err(e) = self.backend.set(STORAGE_KEY, &json) {
            error!(error = %e, "Failed to save local changes");
        } else {
            debug!(entries = patches.len(), bytes = json.len(), "Saved local changes");
        }
    }

    /// Shallow-merge `fields` into the entry for `id`, then persist.
    ///
    /// Returns the merged entry.
    pub fn upsert_patch(&mut self, id: i64, fields: Patch) -> Patch {
        let mut patches = self.get_all_patches();
        let entry = patches.entry(id.to_string()).or_default();
        entry.merge(fields);
        let merged = entry.clone();
        self.save_all_patches(&patches);
        merged
    }

    /// Mark `id` as deleted. Sticky until [`clear`](Self::clear).
    pub fn mark_deleted(&mut self, id: i64) -> Patch {
        self.upsert_patch(id, Patch::deletion())
    }

    /// Create and persist a synthetic item.
    ///
    /// The id is one below the lowest negative id in the map, or `-1`.
    /// Deleted synthetic entries keep their key, so ids are never reused
    /// before a clear.
    pub fn create_synthetic(&mut self, text: &str) -> Item {
        let mut patches = self.get_all_patches();
        let id = next_synthetic_id(&patches);
        let item = Item::synthetic(id, text.to_string());

        patches.insert(id.to_string(), Patch::full_record(&item));
        self.save_all_patches(&patches);
        debug!(id, "Created local todo");
        item
    }

    /// Remove the whole persisted blob.
    pub fn clear(&mut self) {
        if let Err(e) = self.backend.remove(STORAGE_KEY) {
            error!(error = %e, "Failed to clear local changes");
        }
    }

    /// Count entries by kind.
    pub fn stats(&self) -> PatchStats {
        let mut stats = PatchStats::default();
        for (key, patch) in &self.get_all_patches() {
            if patch.is_deleted() {
                stats.deleted += 1;
            } else if key.parse::<i64>().is_ok_and(|id| id < 0) {
                stats.created += 1;
            } else {
                stats.edited += 1;
            }
        }
        stats
    }
}

fn next_synthetic_id(patches: &PatchMap) -> i64 {
    let Some(lowest) = patches
        .keys()
        .filter_map(|key| key.parse::<i64>().ok())
        .filter(|id| *id < 0)
        .min()
    else {
        return -1;
    };

    lowest.checked_sub(1).unwrap_or_else(|| {
        warn!(lowest, "No id below the lowest local todo, using the first unused one");
        first_unused_negative_id(patches)
    })
}

/// Highest negative id with no entry at all, deleted or not.
fn first_unused_negative_id(patches: &PatchMap) -> i64 {
    (1..=i64::MAX)
        .map(|n| -n)
        .find(|id| !patches.contains_key(&id.to_string()))
        .unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;

    fn store() -> PatchStore<MemoryStore> {
        PatchStore::new(MemoryStore::new())
    }

    #[test]
    fn test_absent_blob_is_empty() {
        assert!(store().get_all_patches().is_empty());
    }

    #[test]
    fn test_corrupt_blob_is_empty() {
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, "{not json").unwrap();
        assert!(PatchStore::new(backend).get_all_patches().is_empty());

        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, r#"["wrong","shape"]"#).unwrap();
        assert!(PatchStore::new(backend).get_all_patches().is_empty());

        let mut backend = MemoryStore::new();
        backend
            .set(STORAGE_KEY, r#"{"1":{"completed":"yes"}}"#)
            .unwrap();
        assert!(PatchStore::new(backend).get_all_patches().is_empty());
    }

    #[test]
    fn test_upsert_merges_and_persists() {
        let mut patches = store();
        patches.upsert_patch(3, Patch::completed(true));
        let merged = patches.upsert_patch(3, Patch::text("renamed"));

        assert_eq!(merged.completed, Some(true));
        assert_eq!(merged.text.as_deref(), Some("renamed"));

        let raw = patches.backend().get(STORAGE_KEY).unwrap().unwrap();
        let reread: PatchMap = serde_json::from_str(&raw).unwrap();
        assert_eq!(reread["3"], merged);
    }

    #[test]
    fn test_mark_deleted_keeps_prior_fields() {
        let mut patches = store();
        patches.upsert_patch(8, Patch::text("edited"));
        let entry = patches.mark_deleted(8);

        assert!(entry.is_deleted());
        assert_eq!(entry.text.as_deref(), Some("edited"));
    }

    #[test]
    fn test_create_synthetic_ids_strictly_decrease() {
        let mut patches = store();
        let first = patches.create_synthetic("one");
        let second = patches.create_synthetic("two");
        let third = patches.create_synthetic("three");

        assert_eq!(first.id, -1);
        assert_eq!(second.id, -2);
        assert_eq!(third.id, -3);
        assert!(!first.completed);
        assert_eq!(first.owner_tag, 1);

        let all = patches.get_all_patches();
        assert_eq!(all["-2"].text.as_deref(), Some("two"));
        assert_eq!(all["-2"].id, Some(-2));
    }

    #[test]
    fn test_create_after_delete_never_reuses_id() {
        let mut patches = store();
        let first = patches.create_synthetic("one");
        let second = patches.create_synthetic("two");
        patches.mark_deleted(second.id);

        let third = patches.create_synthetic("three");
        assert!(third.id < second.id);
        assert!(third.id < first.id);
    }

    #[test]
    fn test_create_below_minimum_id_takes_first_unused() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                STORAGE_KEY,
                r#"{"-9223372036854775808":{"todo":"x"},"-1":{"todo":"y","deleted":true}}"#,
            )
            .unwrap();
        let mut store = PatchStore::new(backend);

        let item = store.create_synthetic("z");
        assert_eq!(item.id, -2);
        assert!(item.is_synthetic());
        assert_eq!(store.get_all_patches().len(), 3);
    }

    #[test]
    fn test_create_ignores_positive_keys() {
        let mut patches = store();
        patches.upsert_patch(5, Patch::completed(true));
        assert_eq!(patches.create_synthetic("x").id, -1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut patches = store();
        patches.create_synthetic("one");
        patches.mark_deleted(4);
        patches.clear();

        assert!(patches.get_all_patches().is_empty());
        assert!(patches.into_inner().is_empty());
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let mut patches = PatchStore::new(MemoryStore::with_quota(2));
        let item = patches.create_synthetic("too big for the quota");

        assert_eq!(item.id, -1);
        assert!(patches.get_all_patches().is_empty());
    }

    #[test]
    fn test_stats() {
        let mut patches = store();
        patches.upsert_patch(1, Patch::completed(true));
        patches.mark_deleted(2);
        patches.create_synthetic("kept");
        let gone = patches.create_synthetic("gone");
        patches.mark_deleted(gone.id);

        let stats = patches.stats();
        assert_eq!(
            stats,
            PatchStats {
                edited: 1,
                deleted: 2,
                created: 1,
            }
        );
        assert_eq!(stats.total(), 4);
    }
}
