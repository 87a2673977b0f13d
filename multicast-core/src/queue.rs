//! # Serial execution contexts
//!
//! Every registration pairs a delegate with a [`Queue`]. A queue accepts
//! tasks and runs the tasks it has accepted strictly one at a time, in the
//! order they were accepted. Different queues run independently of one
//! another and of the producer.
//!
//! Anything that can honour that contract can back a queue: a dedicated
//! worker thread, a task on an async runtime, an event loop's task source.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A unit of work submitted to a queue.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A serial, FIFO, single-worker task acceptor.
///
/// # Contract
///
/// - Tasks accepted by `execute` run one at a time, in acceptance order.
/// - `execute` hands the task over and returns; it never waits for the task
///   (or for earlier tasks) to run.
/// - What happens when a task panics is up to the executor. The shipped
///   executors catch the panic at the task boundary and keep running.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `SerialExecutor`",
    label = "missing `SerialExecutor` implementation",
    note = "Executors must run accepted tasks one at a time in FIFO order."
)]
pub trait SerialExecutor: Send + Sync + 'static {
    /// Accept a task for later execution.
    fn execute(&self, task: Task);

    /// A human readable name, for logs and `Debug` output.
    fn label(&self) -> &str {
        "anonymous"
    }

    /// Whether the calling code is running inside a task of this executor.
    fn is_current(&self) -> bool {
        false
    }

    /// Whether blocking the calling thread until a task of this executor
    /// has run would never finish, because the executor's worker can only
    /// make progress on that same thread.
    fn stalls_blocked_caller(&self) -> bool {
        false
    }
}

/// A shared handle to a serial executor.
///
/// Queues compare by identity: two handles are equal when they point at the
/// same executor, whatever their labels say.
#[derive(Clone)]
pub struct Queue {
    inner: Arc<dyn SerialExecutor>,
}

impl Queue {
    /// Wrap an executor in a new queue handle.
    pub fn new<E: SerialExecutor>(executor: E) -> Self {
        Self {
            inner: Arc::new(executor),
        }
    }

    /// Wrap an already shared executor.
    pub fn from_arc(inner: Arc<dyn SerialExecutor>) -> Self {
        Self { inner }
    }

    /// Submit a task.
    pub fn execute(&self, task: Task) {
        self.inner.execute(task);
    }

    /// Submit a closure.
    pub fn dispatch<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.execute(Box::new(f));
    }

    /// The executor's label.
    pub fn label(&self) -> &str {
        self.inner.label()
    }

    /// Whether the calling code is running on this queue.
    pub fn is_current(&self) -> bool {
        self.inner.is_current()
    }

    /// Whether blocking the calling thread on this queue would stall it.
    pub fn stalls_blocked_caller(&self) -> bool {
        self.inner.stalls_blocked_caller()
    }

    /// The underlying executor.
    pub fn executor(&self) -> &Arc<dyn SerialExecutor> {
        &self.inner
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.inner) as *const ()
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for Queue {}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("label", &self.label())
            .field("addr", &self.addr())
            .finish()
    }
}

impl<E: SerialExecutor> From<Arc<E>> for Queue {
    fn from(inner: Arc<E>) -> Self {
        Self { inner }
    }
}
