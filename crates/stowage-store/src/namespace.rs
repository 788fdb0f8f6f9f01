//! Key prefixing so several apps can share one backend.

use crate::error::StoreResult;
use crate::storage::DurableStorage;

/// Wraps a backend and maps `key` to `{namespace}/{key}`.
///
/// `keys()` only reports slots inside the namespace, with the prefix
/// stripped.
pub struct Namespaced<S> {
    inner: S,
    prefix: String,
}

impl<S: DurableStorage> Namespaced<S> {
    pub fn new(inner: S, namespace: &str) -> Self {
        Self {
            inner,
            prefix: format!("{}/", namespace.trim_end_matches('/')),
        }
    }

    pub fn namespace(&self) -> &str {
        self.prefix.trim_end_matches('/')
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl<S: DurableStorage> DurableStorage for Namespaced<S> {
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.read_raw(&self.scoped(key))
    }

    fn write_raw(&self, key: &str, raw: &str) -> StoreResult<()> {
        self.inner.write_raw(&self.scoped(key), raw)
    }

    fn remove_raw(&self, key: &str) -> StoreResult<bool> {
        self.inner.remove_raw(&self.scoped(key))
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryStorage;

    #[test]
    fn namespaces_do_not_collide() {
        let shared = Arc::new(MemoryStorage::new());
        let alpha = Namespaced::new(shared.clone(), "alpha");
        let beta = Namespaced::new(shared.clone(), "beta/");

        alpha.write_raw("theme", "\"dark\"").unwrap();
        beta.write_raw("theme", "\"light\"").unwrap();

        assert_eq!(alpha.read_raw("theme").unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(beta.read_raw("theme").unwrap().as_deref(), Some("\"light\""));
        assert_eq!(beta.namespace(), "beta");
        assert_eq!(shared.keys().unwrap(), vec!["alpha/theme", "beta/theme"]);
    }

    #[test]
    fn keys_are_scoped_and_stripped() {
        let shared = Arc::new(MemoryStorage::with_slots([
            ("alpha/todos", "[]"),
            ("alpha/users", "[]"),
            ("other", "1"),
        ]));
        let alpha = Namespaced::new(shared.clone(), "alpha");
        assert_eq!(alpha.keys().unwrap(), vec!["todos", "users"]);
        assert!(alpha.remove_raw("todos").unwrap());
        assert!(shared.read_raw("alpha/todos").unwrap().is_none());
    }
}
