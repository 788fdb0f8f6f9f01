//! stowage-store: durable key-value slots for Stowage cells.
//!
//! A slot is a string key holding opaque text. Cells own the encoding; the
//! store only moves strings in and out.
//!
//! # Backends
//!
//! - [`RedbStorage`]: a [redb](https://docs.rs/redb) database, on disk or
//!   in memory. Survives process restarts when opened from a path.
//! - [`MemoryStorage`]: a plain map, for tests and throwaway sessions.
//! - [`Namespaced`]: wraps any backend and prefixes every key with
//!   `{namespace}/`, so several apps can share one database.
//!
//! All backends are `Send + Sync` and are normally shared as
//! [`SharedStorage`] (`Arc<dyn DurableStorage>`).

pub mod error;
pub mod memory;
pub mod namespace;
pub mod storage;
pub mod store;
pub mod tables;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStorage;
pub use namespace::Namespaced;
pub use storage::{DurableStorage, SharedStorage};
pub use store::RedbStorage;
