//! Observer registry and the guard that keeps a registration alive.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback run after every change. An `Err` is reported, not propagated.
pub type Observer<T> = Arc<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

/// Registered observers in registration order.
pub(crate) struct ObserverList<T> {
    next_id: u64,
    entries: Vec<(u64, Observer<T>)>,
}

pub(crate) type SharedObservers<T> = Arc<Mutex<ObserverList<T>>>;

impl<T> ObserverList<T> {
    pub(crate) fn shared() -> SharedObservers<T> {
        Arc::new(Mutex::new(Self {
            next_id: 0,
            entries: Vec::new(),
        }))
    }

    pub(crate) fn insert(&mut self, observer: Observer<T>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub(crate) fn snapshot(&self) -> Vec<(u64, Observer<T>)> {
        self.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by `subscribe`.
///
/// The observer stays registered while the handle lives. Dropping it or
/// calling [`Subscription::unsubscribe`] deregisters the observer; use
/// [`Subscription::detach`] to keep it registered for the cell's lifetime.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription {
    id: u64,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new<T: Send + 'static>(id: u64, observers: &SharedObservers<T>) -> Self {
        let registry: Weak<Mutex<ObserverList<T>>> = Arc::downgrade(observers);
        Self {
            id,
            release: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(id);
                }
            })),
        }
    }

    /// Registration id, unique per cell.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    /// Keep the observer registered without holding the handle.
    pub fn detach(mut self) {
        self.release = None;
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.release.is_some())
            .finish()
    }
}
