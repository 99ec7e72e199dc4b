//! Todo item model.
//!
//! Field names on the wire follow the DummyJSON API so that fetched
//! payloads and persisted synthetic records share one shape.

use serde::{Deserialize, Serialize};

/// Owner tag given to locally created todos.
pub const LOCAL_OWNER_TAG: i64 = 1;

/// A todo as displayed to the user.
///
/// Positive ids come from the remote snapshot. Negative ids denote
/// synthetic items that only exist in the local patch store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,

    /// Todo text (`todo` on the wire)
    #[serde(rename = "todo")]
    pub text: String,

    pub completed: bool,

    /// Owning user (`userId` on the wire)
    #[serde(rename = "userId", default = "default_owner_tag")]
    pub owner_tag: i64,
}

fn default_owner_tag() -> i64 {
    LOCAL_OWNER_TAG
}

impl Item {
    /// Build a fresh synthetic item that has never been seen remotely.
    #[must_use]
    pub fn synthetic(id: i64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            owner_tag: LOCAL_OWNER_TAG,
        }
    }

    /// Whether this item only exists locally.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.id < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_remote_shape() {
        let item: Item = serde_json::from_str(
            r#"{"id":7,"todo":"Water plants","completed":true,"userId":42}"#,
        )
        .unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.text, "Water plants");
        assert!(item.completed);
        assert_eq!(item.owner_tag, 42);
        assert!(!item.is_synthetic());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let item = Item::synthetic(-2, "Local".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["todo"], "Local");
        assert_eq!(json["userId"], 1);
        assert_eq!(json["completed"], false);
        assert!(item.is_synthetic());
    }
}
