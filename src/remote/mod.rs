//! Remote todo source.
//!
//! The remote API is read-only from our point of view: it serves a
//! snapshot of todos and nothing we write ever reaches it.
//!
//! - [`source`] - The `RemoteSource` trait
//! - [`dummyjson`] - DummyJSON HTTP implementation

pub mod dummyjson;
pub mod source;

pub use dummyjson::{parse_snapshot, DummyJsonSource, DEFAULT_ENDPOINT};
pub use source::RemoteSource;
