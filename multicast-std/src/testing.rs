//! Testing utilities for multicast delegates.
//!
//! # Features
//!
//! - [`ManualQueue`]: a queue that only runs tasks when the test tells it to
//! - [`CallLog`]: a shared, ordered record of deliveries

use multicast_core::{SerialExecutor, Task};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Manual Queue
// ============================================================================

/// A deterministic queue driven by the test.
///
/// Accepted tasks wait until [`run_next`](Self::run_next) or
/// [`run_pending`](Self::run_pending) is called, on the calling thread.
///
/// # Example
///
/// ```rust
/// use multicast_core::Queue;
/// use multicast_std::testing::ManualQueue;
/// use std::sync::Arc;
///
/// let manual = Arc::new(ManualQueue::new("manual"));
/// let queue = Queue::from(manual.clone());
///
/// queue.dispatch(|| {});
/// assert_eq!(manual.pending(), 1);
/// assert_eq!(manual.run_pending(), 1);
/// ```
pub struct ManualQueue {
    label: String,
    tasks: Mutex<VecDeque<Task>>,
}

impl ManualQueue {
    /// Create an empty queue.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }

    /// Run the oldest waiting task. Returns `false` if there was none.
    pub fn run_next(&self) -> bool {
        // Pop before running so the task may enqueue onto this queue.
        let task = lock(&self.tasks).pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until none are left, including tasks enqueued meanwhile.
    ///
    /// Returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Discard every waiting task. Returns how many were discarded.
    pub fn clear(&self) -> usize {
        let drained: Vec<Task> = lock(&self.tasks).drain(..).collect();
        drained.len()
    }
}

impl Default for ManualQueue {
    fn default() -> Self {
        Self::new("manual")
    }
}

impl SerialExecutor for ManualQueue {
    fn execute(&self, task: Task) {
        lock(&self.tasks).push_back(task);
    }

    fn label(&self) -> &str {
        &self.label
    }
}

// ============================================================================
// Call Log
// ============================================================================

/// A shared, ordered record of calls.
///
/// Clones share the same record, so a test keeps one clone and hands the
/// others to the delegates under test.
///
/// # Example
///
/// ```rust
/// use multicast_std::testing::CallLog;
///
/// let log: CallLog = CallLog::new();
/// let recorder = log.clone();
/// recorder.record("did_connect");
/// assert_eq!(log.entries(), vec!["did_connect"]);
/// ```
pub struct CallLog<T = String> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> CallLog<T> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<T>) {
        lock(&self.entries).push(entry.into());
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Forget every entry.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl<T: Clone> CallLog<T> {
    /// A copy of the recorded entries, oldest first.
    pub fn entries(&self) -> Vec<T> {
        lock(&self.entries).clone()
    }
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CallLog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
