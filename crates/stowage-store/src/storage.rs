//! The durable storage seam cells are written against.

use std::sync::Arc;

use crate::error::StoreResult;

/// Key-value text store that outlives the process.
///
/// Implementations must be safe to share between cells; each call is
/// independent and last write wins.
pub trait DurableStorage: Send + Sync {
    /// Raw text stored under `key`, or `None` when the slot is empty.
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the text stored under `key`.
    fn write_raw(&self, key: &str, raw: &str) -> StoreResult<()>;

    /// Clear a slot. Returns true if it held a value.
    fn remove_raw(&self, key: &str) -> StoreResult<bool>;

    /// All occupied slot names, in key order.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Storage handle shared by every cell in a process.
pub type SharedStorage = Arc<dyn DurableStorage>;

impl<S: DurableStorage + ?Sized> DurableStorage for Arc<S> {
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read_raw(key)
    }

    fn write_raw(&self, key: &str, raw: &str) -> StoreResult<()> {
        (**self).write_raw(key, raw)
    }

    fn remove_raw(&self, key: &str) -> StoreResult<bool> {
        (**self).remove_raw(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
