//! Data models for Hybrid Todo.
//!
//! This module contains the domain models:
//! - Item (a todo, remote or synthetic)
//! - Patch (a local overlay entry for one item id)
//! - PageQuery / StatusFilter (the navigational parameters)

pub mod item;
pub mod patch;
pub mod query;

pub use item::Item;
pub use patch::{Patch, PatchMap};
pub use query::{PageQuery, StatusFilter, DEFAULT_PAGE, DEFAULT_PER_PAGE};
