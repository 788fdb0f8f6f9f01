//! RedbStorage: redb-backed slot persistence for Stowage.
//!
//! Every slot lives in a single `slots` table as `&str → &str`. The store
//! supports both on-disk and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::storage::DurableStorage;
use crate::tables::SLOTS;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Thread-safe slot store backed by redb.
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open (or create) a persistent slot store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(map_err!(Open))?;
        }
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "slot store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory slot store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory slot store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(SLOTS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

impl DurableStorage for RedbStorage {
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SLOTS).map_err(map_err!(Table))?;
        let raw = table
            .get(key)
            .map_err(map_err!(Read))?
            .map(|guard| guard.value().to_string());
        debug!(%key, found = raw.is_some(), "slot read");
        Ok(raw)
    }

    fn write_raw(&self, key: &str, raw: &str) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SLOTS).map_err(map_err!(Table))?;
            table.insert(key, raw).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, bytes = raw.len(), "slot written");
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(SLOTS).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "slot removed");
        Ok(existed)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SLOTS).map_err(map_err!(Table))?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_write_and_read() {
        let store = RedbStorage::open_in_memory().unwrap();
        store.write_raw("theme", "\"dark\"").unwrap();
        assert_eq!(store.read_raw("theme").unwrap().as_deref(), Some("\"dark\""));
    }

    #[test]
    fn slot_read_nonexistent_returns_none() {
        let store = RedbStorage::open_in_memory().unwrap();
        assert!(store.read_raw("nothing").unwrap().is_none());
    }

    #[test]
    fn slot_overwrite_in_place() {
        let store = RedbStorage::open_in_memory().unwrap();
        store.write_raw("todos", "[]").unwrap();
        store.write_raw("todos", "[1]").unwrap();
        assert_eq!(store.read_raw("todos").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.keys().unwrap(), vec!["todos".to_string()]);
    }

    #[test]
    fn slot_remove() {
        let store = RedbStorage::open_in_memory().unwrap();
        store.write_raw("user", "null").unwrap();

        assert!(store.remove_raw("user").unwrap());
        assert!(!store.remove_raw("user").unwrap());
        assert!(store.read_raw("user").unwrap().is_none());
    }

    #[test]
    fn keys_are_listed_in_order() {
        let store = RedbStorage::open_in_memory().unwrap();
        for key in ["users", "theme", "todos"] {
            store.write_raw(key, "0").unwrap();
        }
        assert_eq!(store.keys().unwrap(), vec!["theme", "todos", "users"]);
    }

    #[test]
    fn empty_store_operations() {
        let store = RedbStorage::open_in_memory().unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.remove_raw("nope").unwrap());
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("state.redb");

        {
            let store = RedbStorage::open(&db_path).unwrap();
            store.write_raw("theme", "\"dark\"").unwrap();
        }

        // Reopen the same database file.
        let store = RedbStorage::open(&db_path).unwrap();
        assert_eq!(store.read_raw("theme").unwrap().as_deref(), Some("\"dark\""));
    }
}
