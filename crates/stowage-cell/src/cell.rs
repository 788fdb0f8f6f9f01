//! SyncedCell: a reactive value mirrored into durable storage.

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use stowage_store::SharedStorage;
use tracing::{debug, warn};

use crate::error::{CellError, CellResult};
use crate::subscription::{Observer, ObserverList, SharedObservers, Subscription};

/// Hook receiving absorbed failures.
pub type ErrorHook = Arc<dyn Fn(&CellError) + Send + Sync>;

/// Hook run once per change, after every subscriber has been notified.
pub type NotifyHook<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Where the initial value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// Decoded from storage.
    Stored,
    /// Storage held nothing under the key.
    Default,
    /// Storage held something unusable, or could not be read.
    Recovered,
}

/// Optional hooks for a cell.
pub struct CellOptions<T> {
    on_persist_error: Option<ErrorHook>,
    on_observer_error: Option<ErrorHook>,
    after_notify: Option<NotifyHook<T>>,
}

impl<T> Default for CellOptions<T> {
    fn default() -> Self {
        Self {
            on_persist_error: None,
            on_observer_error: None,
            after_notify: None,
        }
    }
}

impl<T> CellOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive decode, encode and storage failures.
    pub fn on_persist_error(mut self, hook: impl Fn(&CellError) + Send + Sync + 'static) -> Self {
        self.on_persist_error = Some(Arc::new(hook));
        self
    }

    /// Receive subscriber failures. Falls back to `on_persist_error` when unset.
    pub fn on_observer_error(mut self, hook: impl Fn(&CellError) + Send + Sync + 'static) -> Self {
        self.on_observer_error = Some(Arc::new(hook));
        self
    }

    pub fn after_notify(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.after_notify = Some(Arc::new(hook));
        self
    }

    fn report_persist(&self, err: &CellError) {
        if let Some(hook) = &self.on_persist_error {
            hook(err);
        }
    }

    fn report_observer(&self, err: &CellError) {
        match (&self.on_observer_error, &self.on_persist_error) {
            (Some(hook), _) | (None, Some(hook)) => hook(err),
            (None, None) => {}
        }
    }
}

struct CellInner<T> {
    key: String,
    default: T,
    hydration: Hydration,
    value: RwLock<T>,
    // Held from the memory write until the durable write lands.
    commit: Mutex<()>,
    // Bumped by every commit; a notification pass stops once it moves on.
    generation: AtomicU64,
    storage: SharedStorage,
    observers: SharedObservers<T>,
    options: CellOptions<T>,
}

/// A named value kept in sync with durable storage.
///
/// Cloning yields another handle to the same cell.
pub struct SyncedCell<T> {
    inner: Arc<CellInner<T>>,
}

impl<T> Clone for SyncedCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SyncedCell<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a cell with no hooks installed.
    pub fn create(storage: SharedStorage, key: impl Into<String>, default: T) -> CellResult<Self> {
        Self::create_with(storage, key, default, CellOptions::default())
    }

    /// Create a cell, hydrating it from `storage`.
    ///
    /// Storage is read exactly once, here. Anything that cannot be decoded
    /// as `T` leaves the cell at `default`.
    pub fn create_with(
        storage: SharedStorage,
        key: impl Into<String>,
        default: T,
        options: CellOptions<T>,
    ) -> CellResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CellError::EmptyKey);
        }

        let (value, hydration) = match storage.read_raw(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => (value, Hydration::Stored),
                Err(e) => {
                    let err = CellError::Decode {
                        key: key.clone(),
                        message: e.to_string(),
                    };
                    warn!(%key, error = %err, "stored value unusable, using default");
                    options.report_persist(&err);
                    (default.clone(), Hydration::Recovered)
                }
            },
            Ok(None) => (default.clone(), Hydration::Default),
            Err(source) => {
                let err = CellError::Storage {
                    key: key.clone(),
                    source,
                };
                warn!(%key, error = %err, "storage read failed, using default");
                options.report_persist(&err);
                (default.clone(), Hydration::Recovered)
            }
        };
        debug!(%key, ?hydration, "cell ready");

        Ok(Self {
            inner: Arc::new(CellInner {
                key,
                default,
                hydration,
                value: RwLock::new(value),
                commit: Mutex::new(()),
                generation: AtomicU64::new(0),
                storage,
                observers: ObserverList::shared(),
                options,
            }),
        })
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn hydration(&self) -> Hydration {
        self.inner.hydration
    }

    pub fn default_value(&self) -> &T {
        &self.inner.default
    }

    /// Current in-memory value. Never touches storage.
    pub fn get(&self) -> T {
        self.read_value().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// The cell is locked for reads while `f` runs; do not call `set` from
    /// inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.read_value())
    }

    /// Replace the value, persist it, then notify subscribers.
    pub fn set(&self, value: T) {
        self.modify(|current| *current = value);
    }

    /// Derive the next value from the latest one.
    ///
    /// `f` may read the cell through any handle, but must not write to it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.modify(|current| *current = f(current));
    }

    /// Edit the value in place and return whatever `f` returns.
    ///
    /// `f` may read the cell through any handle, but must not write to it.
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let Ok(out) = self.commit(|current| Ok::<_, Infallible>(f(current)));
        out
    }

    /// As [`SyncedCell::modify`], but an `Err` from `f` discards its edits.
    ///
    /// Nothing is written or notified on `Err`.
    pub fn try_modify<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        self.commit(f)
    }

    /// Put the default value back (and persist it).
    pub fn reset(&self) {
        self.set(self.inner.default.clone());
    }

    /// Register `observer` for every later change.
    pub fn subscribe(
        &self,
        observer: impl Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        let observer: Observer<T> = Arc::new(observer);
        let id = self.observers().insert(observer);
        debug!(key = %self.inner.key, subscriber = id, "subscribed");
        Subscription::new(id, &self.inner.observers)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers().len()
    }

    /// Apply `edit` to a copy of the latest value, store it, then notify.
    ///
    /// Commits are serialized so storage always ends up holding the value
    /// memory holds. Hooks and observers run after the commit lock is
    /// released.
    fn commit<R, E>(&self, edit: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let (next, out, generation, failure) = {
            let _commit = self.inner.commit.lock().unwrap_or_else(PoisonError::into_inner);
            let mut next = self.get();
            let out = edit(&mut next)?;
            *self.write_value() = next.clone();
            let failure = self.persist(&next);
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (next, out, generation, failure)
        };
        if let Some(err) = failure {
            self.inner.options.report_persist(&err);
        }
        self.notify(&next, generation);
        Ok(out)
    }

    fn persist(&self, value: &T) -> Option<CellError> {
        let key = &self.inner.key;
        let err = match serde_json::to_string(value) {
            Ok(raw) => match self.inner.storage.write_raw(key, &raw) {
                Ok(()) => return None,
                Err(source) => CellError::Storage {
                    key: key.clone(),
                    source,
                },
            },
            Err(e) => CellError::Encode {
                key: key.clone(),
                message: e.to_string(),
            },
        };
        warn!(%key, error = %err, "value not persisted, memory and storage diverge");
        Some(err)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) != generation
    }

    fn notify(&self, value: &T, generation: u64) {
        // No lock is held while observers run, so they may call `set`. A
        // newer commit runs its own pass; this one stops so nobody sees
        // `value` after the newer one.
        let snapshot = self.observers().snapshot();
        for (id, observer) in snapshot {
            if self.is_stale(generation) {
                debug!(key = %self.inner.key, "superseded, notification pass stopped");
                return;
            }
            if !self.observers().contains(id) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer(value)));
            let message = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => format!("{e:#}"),
                Err(payload) => panic_message(payload.as_ref()),
            };
            let err = CellError::Observer {
                key: self.inner.key.clone(),
                subscriber: id,
                message,
            };
            warn!(key = %self.inner.key, subscriber = id, error = %err, "subscriber failed");
            self.inner.options.report_observer(&err);
        }
        if self.is_stale(generation) {
            return;
        }
        if let Some(hook) = &self.inner.options.after_notify {
            hook(value);
        }
    }

    fn observers(&self) -> MutexGuard<'_, ObserverList<T>> {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_value(&self) -> RwLockReadGuard<'_, T> {
        self.inner.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_value(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.value.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SyncedCell");
        s.field("key", &self.inner.key)
            .field("hydration", &self.inner.hydration);
        match self.inner.value.try_read() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &"<locked>"),
        };
        s.finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "subscriber panicked".to_string()
    }
}
