//! Callback registration with scoped lifetimes
//!
//! Registering a callback hands back a [`Subscription`]. The callback stays
//! installed while the guard lives; dropping the guard (or calling
//! [`Subscription::dispose`]) removes it. Dead entries are pruned the next
//! time the registry is walked.

use std::cell::Cell;
use std::rc::Rc;

/// Guard that keeps a registered callback alive
#[must_use = "dropping a Subscription unregisters the callback"]
#[derive(Debug)]
pub struct Subscription {
    alive: Rc<Cell<bool>>,
}

impl Subscription {
    /// Unregister now
    pub fn dispose(self) {}

    /// Keep the callback installed for the lifetime of its registry
    pub fn forget(self) {
        std::mem::forget(self);
    }

    pub fn is_active(&self) -> bool {
        self.alive.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

struct Entry<T: ?Sized> {
    alive: Rc<Cell<bool>>,
    callback: Box<T>,
}

/// An ordered list of callbacks, each owned by a [`Subscription`]
pub struct Registry<T: ?Sized> {
    entries: Vec<Entry<T>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn insert(&mut self, callback: Box<T>) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.entries.push(Entry {
            alive: Rc::clone(&alive),
            callback,
        });
        Subscription { alive }
    }

    /// Number of live callbacks
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.alive.get()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live callbacks in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.prune();
        self.entries.iter_mut().map(|e| e.callback.as_mut())
    }

    fn prune(&mut self) {
        self.entries.retain(|e| e.alive.get());
    }
}
