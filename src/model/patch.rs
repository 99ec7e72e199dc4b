//! Local patch entries.
//!
//! A patch describes how the remote value of one item id is altered or
//! suppressed when displayed. The same struct covers all three shapes
//! found in the persisted map:
//! - partial field update: `{ "todo"?, "completed"? }`
//! - deletion marker: `{ "deleted": true }`, possibly with earlier fields
//! - full synthetic record: `{ "id", "todo", "completed", "userId" }`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::item::{Item, LOCAL_OWNER_TAG};

/// Persisted patch map: decimal-string item id → patch entry.
pub type PatchMap = BTreeMap<String, Patch>;

/// A shallow set of field overrides for one item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "todo", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner_tag: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl Patch {
    /// Patch that replaces the todo text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Patch that sets the completion flag.
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Deletion marker.
    #[must_use]
    pub fn deletion() -> Self {
        Self {
            deleted: Some(true),
            ..Self::default()
        }
    }

    /// Full record for a synthetic item.
    #[must_use]
    pub fn full_record(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            text: Some(item.text.clone()),
            completed: Some(item.completed),
            owner_tag: Some(item.owner_tag),
            deleted: None,
        }
    }

    /// Whether this entry suppresses its item.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted == Some(true)
    }

    /// Shallow-merge a later write into this entry.
    ///
    /// Fields present in `later` overwrite, absent fields are kept.
    /// A deletion never gets undone by a later field update.
    pub fn merge(&mut self, later: Self) {
        if later.id.is_some() {
            self.id = later.id;
        }
        if later.text.is_some() {
            self.text = later.text;
        }
        if later.completed.is_some() {
            self.completed = later.completed;
        }
        if later.owner_tag.is_some() {
            self.owner_tag = later.owner_tag;
        }
        if !self.is_deleted() && later.deleted.is_some() {
            self.deleted = later.deleted;
        }
    }

    /// Overlay this entry's fields onto a remote item.
    ///
    /// The item's id is never rewritten.
    #[must_use]
    pub fn apply_to(&self, item: &Item) -> Item {
        Item {
            id: item.id,
            text: self.text.clone().unwrap_or_else(|| item.text.clone()),
            completed: self.completed.unwrap_or(item.completed),
            owner_tag: self.owner_tag.unwrap_or(item.owner_tag),
        }
    }

    /// Materialize this entry as a synthetic item keyed by `id`.
    ///
    /// Returns `None` when the entry carries no text, i.e. it is not a
    /// full record.
    #[must_use]
    pub fn to_synthetic(&self, id: i64) -> Option<Item> {
        let text = self.text.clone()?;
        Some(Item {
            id,
            text,
            completed: self.completed.unwrap_or(false),
            owner_tag: self.owner_tag.unwrap_or(LOCAL_OWNER_TAG),
        })
    }
}
