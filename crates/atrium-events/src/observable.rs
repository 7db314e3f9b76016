//! Observable value container
//!
//! Holds a current value and notifies registered listeners synchronously on
//! the calling context. Notification is unconditional: setting a value equal
//! to the current one still fires, so consumers driven by events rather than
//! value diffs behave correctly.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    listeners: Mutex<HashMap<u64, Listener<T>>>,
    next_id: AtomicU64,
}

/// A shared value with change listeners.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(initial),
                listeners: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Store a new value and notify all listeners.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.notify();
    }

    /// Re-notify listeners with the current value without changing it.
    pub fn trigger(&self) {
        self.notify();
    }

    /// Register a change listener.
    ///
    /// The listener runs synchronously on whichever thread calls `set` or
    /// `trigger`. Dropping the returned [`Subscription`] deregisters it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().insert(id, Arc::new(listener));

        tracing::debug!(listener_id = id, "Registered observable listener");

        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    // Listeners are cloned out before invocation so a listener may subscribe
    // or drop subscriptions without deadlocking.
    fn notify(&self) {
        let value = self.inner.value.read().clone();
        let listeners: Vec<(u64, Listener<T>)> = {
            let map = self.inner.listeners.lock();
            let mut entries: Vec<_> = map.iter().map(|(id, l)| (*id, Arc::clone(l))).collect();
            entries.sort_by_key(|(id, _)| *id);
            entries
        };

        for (_, listener) in listeners {
            listener(&value);
        }
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Unsubscribe handle returned by [`Observable::subscribe`].
///
/// Deregisters the listener when dropped.
pub struct Subscription<T> {
    inner: Weak<Inner<T>>,
    id: u64,
}

impl<T> Subscription<T> {
    /// Deregister immediately instead of at drop time.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.lock().remove(&self.id);
            tracing::debug!(listener_id = self.id, "Deregistered observable listener");
        }
    }
}
