//! Registration storage for [`MulticastDelegate`].
//!
//! The registry is an insertion-ordered sequence of `(delegate, queue)`
//! pairs behind a single `RwLock`. The sequence itself is an `Arc<Vec<_>>`:
//! readers clone the `Arc` and walk their own snapshot with the lock
//! released, writers replace or copy-on-write it.
//!
//! [`MulticastDelegate`]: crate::MulticastDelegate

use multicast_core::{Delegate, Queue};
use std::{
    fmt,
    mem,
    sync::{Arc, PoisonError, RwLock},
};

/// One delegate paired with the queue it wants to be called on.
pub struct Registration<D: ?Sized> {
    delegate: Arc<D>,
    queue: Queue,
}

impl<D: ?Sized> Registration<D> {
    pub(crate) fn new(delegate: Arc<D>, queue: Queue) -> Self {
        Self { delegate, queue }
    }

    /// The registered delegate.
    pub fn delegate(&self) -> &Arc<D> {
        &self.delegate
    }

    /// The queue deliveries to this delegate run on.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Whether this registration is for `delegate`, on any queue.
    pub fn is_for(&self, delegate: &Arc<D>) -> bool {
        Arc::ptr_eq(&self.delegate, delegate)
    }

    /// Whether this registration is exactly `(delegate, queue)`.
    pub fn matches(&self, delegate: &Arc<D>, queue: &Queue) -> bool {
        self.is_for(delegate) && self.queue == *queue
    }
}

impl<D: ?Sized> Clone for Registration<D> {
    fn clone(&self) -> Self {
        Self {
            delegate: Arc::clone(&self.delegate),
            queue: self.queue.clone(),
        }
    }
}

impl<D: ?Sized + Delegate> fmt::Debug for Registration<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("delegate", &self.delegate.delegate_type_name())
            .field("queue", &self.queue)
            .finish()
    }
}

/// A point-in-time copy of the registry.
pub(crate) type Snapshot<D> = Arc<Vec<Registration<D>>>;

pub(crate) struct Registry<D: ?Sized> {
    entries: RwLock<Snapshot<D>>,
}

impl<D: ?Sized> Registry<D> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }

    // No user code runs while the lock is held, so a poisoned lock still
    // guards a consistent sequence.

    pub(crate) fn snapshot(&self) -> Snapshot<D> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Append `(delegate, queue)` unless that exact pair is present.
    ///
    /// Returns the registration count after the call and whether anything
    /// was inserted.
    pub(crate) fn insert(&self, delegate: Arc<D>, queue: Queue) -> (usize, bool) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if guard.iter().any(|r| r.matches(&delegate, &queue)) {
            return (guard.len(), false);
        }
        let entries = Arc::make_mut(&mut guard);
        entries.push(Registration::new(delegate, queue));
        (entries.len(), true)
    }

    /// Drop every registration for which `remove` returns true.
    ///
    /// Returns the registration count after the call and how many were
    /// removed.
    pub(crate) fn remove_where<F>(&self, mut remove: F) -> (usize, usize)
    where
        F: FnMut(&Registration<D>) -> bool,
    {
        let previous;
        let result;
        {
            let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let kept: Vec<_> = guard.iter().filter(|r| !remove(r)).cloned().collect();
            if kept.len() == guard.len() {
                return (kept.len(), 0);
            }
            result = (kept.len(), guard.len() - kept.len());
            previous = mem::replace(&mut *guard, Arc::new(kept));
        }
        // Released after the guard: dropping a delegate may run code that
        // calls back into the registry.
        drop(previous);
        result
    }

    /// Remove everything. Returns how many registrations were removed.
    pub(crate) fn clear(&self) -> usize {
        let previous = {
            let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            mem::replace(&mut *guard, Arc::new(Vec::new()))
        };
        previous.len()
    }
}
