//! In-process slot storage. Nothing survives the process.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::storage::DurableStorage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw slot contents.
    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: RwLock::new(
                slots
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl DurableStorage for MemoryStorage {
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let slots = self.slots.read().map_err(|_| StoreError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn write_raw(&self, key: &str, raw: &str) -> StoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| StoreError::Poisoned)?;
        slots.insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> StoreResult<bool> {
        let mut slots = self.slots.write().map_err(|_| StoreError::Poisoned)?;
        Ok(slots.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let slots = self.slots.read().map_err(|_| StoreError::Poisoned)?;
        Ok(slots.keys().cloned().collect())
    }
}
