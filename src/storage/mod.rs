//! Local persistence for Hybrid Todo.
//!
//! The overlay lives in a flat key-value store, the terminal counterpart
//! of browser local storage:
//! - One key holds the whole patch map as a JSON blob
//! - Every mutation is a full read-modify-write of that blob
//! - Last write wins across concurrent processes
//!
//! # Submodules
//!
//! - [`kv`] - The `KeyValueStore` seam and an in-memory backend
//! - [`schema`] - SQLite schema for the on-disk backend
//! - [`sqlite`] - SQLite-backed key-value store
//! - [`patches`] - The local patch store built on top of a backend

pub mod kv;
pub mod patches;
pub mod schema;
pub mod sqlite;

pub use kv::{KeyValueStore, MemoryStore};
pub use patches::{PatchStats, PatchStore, STORAGE_KEY};
pub use sqlite::SqliteStore;
