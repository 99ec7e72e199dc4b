//! Overlay merge.
//!
//! Combines a read-only remote snapshot with the local patch map to
//! produce the effective list of todos. Pure: same inputs, same output.

use tracing::{debug, warn};

use crate::model::{Item, PatchMap};

/// Build the effective list from a remote snapshot and the patch map.
///
/// 1. Remote items with a deletion marker are dropped; the rest get
///    their patch fields applied. Remote order is kept.
/// 2. Negative-id entries that are not deleted become synthetic items,
///    newest (lowest id) first.
/// 3. Synthetic items come before remote items.
///
/// Positive-id entries with no matching remote item are ignored.
#[must_use]
pub fn merge(remote: &[Item], patches: &PatchMap) -> Vec<Item> {
    let mut synthetic: Vec<Item> = patches
        .iter()
        .filter_map(|(key, patch)| {
            let id = key.parse::<i64>().ok().filter(|id| *id < 0)?;
            if patch.is_deleted() {
                return None;
            }
            let item = patch.to_synthetic(id);
            if item.is_none() {
                warn!(id, "Skipping local todo without text");
            }
            item
        })
        .collect();
    synthetic.sort_by_key(|item| item.id);

    let before = remote.len();
    let overlaid = remote.iter().filter_map(|item| {
        match patches.get(&item.id.to_string()) {
            Some(patch) if patch.is_deleted() => None,
            Some(patch) => Some(patch.apply_to(item)),
            None => Some(item.clone()),
        }
    });

    let mut merged = synthetic;
    let synthetic_count = merged.len();
    merged.extend(overlaid);
    debug!(
        remote = before,
        synthetic = synthetic_count,
        effective = merged.len(),
        "Merged local changes"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Patch;

    fn item(id: i64, text: &str, completed: bool) -> Item {
        Item {
            id,
            text: text.to_string(),
            completed,
            owner_tag: 1,
        }
    }

    fn patches(entries: &[(i64, Patch)]) -> PatchMap {
        entries
            .iter()
            .map(|(id, patch)| (id.to_string(), patch.clone()))
            .collect()
    }

    #[test]
    fn test_patch_applied_to_remote_item() {
        let remote = vec![item(1, "a", false), item(2, "b", true)];
        let map = patches(&[(1, Patch::completed(true))]);

        assert_eq!(
            merge(&remote, &map),
            vec![item(1, "a", true), item(2, "b", true)]
        );
    }

    #[test]
    fn test_synthetic_items_come_first() {
        let remote = vec![item(1, "remote", false)];
        let map: PatchMap = serde_json::from_str(
            r#"{"-1": {"id": -1, "todo": "x", "completed": false, "userId": 1}}"#,
        )
        .unwrap();

        let merged = merge(&remote, &map);
        let ids: Vec<i64> = merged.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![-1, 1]);
        assert_eq!(merged[0].text, "x");
    }

    #[test]
    fn test_newest_synthetic_nearest_front() {
        let map = patches(&[
            (-1, Patch::full_record(&Item::synthetic(-1, "old".into()))),
            (-3, Patch::full_record(&Item::synthetic(-3, "newest".into()))),
            (-2, Patch::full_record(&Item::synthetic(-2, "mid".into()))),
        ]);
        let ids: Vec<i64> = merge(&[], &map).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![-3, -2, -1]);
    }

    #[test]
    fn test_deleted_items_are_dropped() {
        let remote = vec![item(1, "a", false), item(2, "b", false)];
        let mut deleted_synthetic = Patch::full_record(&Item::synthetic(-1, "gone".into()));
        deleted_synthetic.merge(Patch::deletion());
        let map = patches(&[(2, Patch::deletion()), (-1, deleted_synthetic)]);

        assert_eq!(merge(&remote, &map), vec![item(1, "a", false)]);
    }

    #[test]
    fn test_patch_outside_snapshot_is_ignored() {
        let remote = vec![item(1, "a", false)];
        let map = patches(&[(200, Patch::text("not fetched"))]);

        assert_eq!(merge(&remote, &map), remote);
    }

    #[test]
    fn test_synthetic_edit_applies() {
        let mut entry = Patch::full_record(&Item::synthetic(-1, "draft".into()));
        entry.merge(Patch::completed(true));
        entry.merge(Patch::text("final"));
        let map = patches(&[(-1, entry)]);

        let merged = merge(&[], &map);
        assert_eq!(merged[0].text, "final");
        assert!(merged[0].completed);
    }

    #[test]
    fn test_incomplete_synthetic_record_is_skipped() {
        let map = patches(&[(-4, Patch::completed(true))]);
        assert!(merge(&[], &map).is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let remote = vec![item(1, "a", false), item(2, "b", true), item(3, "c", false)];
        let map = patches(&[
            (1, Patch::text("A")),
            (3, Patch::deletion()),
            (-1, Patch::full_record(&Item::synthetic(-1, "x".into()))),
        ]);

        assert_eq!(merge(&remote, &map), merge(&remote, &map));
    }

    #[test]
    fn test_deleted_id_never_reappears() {
        let map = patches(&[(2, Patch::deletion())]);
        let snapshots = [
            vec![item(2, "b", false)],
            vec![item(1, "a", false), item(2, "b changed upstream", true)],
            vec![item(2, "dup", false), item(2, "dup", true)],
            vec![],
        ];

        for snapshot in &snapshots {
            assert!(merge(snapshot, &map).iter().all(|i| i.id != 2));
        }
    }
}
