//! A serial queue hosted on a tokio runtime.

use super::{report_dropped, run_task};
use multicast_core::{Queue, QueueError, SerialExecutor, Task};
use std::{
    cell::Cell,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::{
    runtime::{Handle, RuntimeFlavor},
    sync::mpsc,
};

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Id of the queue whose task is running on this thread, 0 when none.
    static CURRENT_QUEUE: Cell<u64> = const { Cell::new(0) };
}

/// A serial queue whose worker is a single task on a tokio runtime.
///
/// Tasks run synchronously, one after another, inside that worker. A task
/// that blocks holds up the runtime thread it is running on; hand long work
/// to `spawn_blocking` from inside the task.
///
/// On a current-thread runtime the worker only runs while that thread is
/// free, so [`flush_blocking`](crate::flush_blocking) refuses such a queue
/// when called from inside the runtime. Await [`flush`](crate::flush)
/// there instead.
///
/// # Example
///
/// ```rust,ignore
/// let queue = TokioQueue::new("events")?.into_queue();
/// queue.dispatch(|| tracing::info!("on the events queue"));
/// multicast_std::flush(&queue).await;
/// ```
pub struct TokioQueue {
    label: Arc<str>,
    sender: mpsc::UnboundedSender<Task>,
    id: u64,
    flavor: RuntimeFlavor,
}

impl TokioQueue {
    /// Spawn a queue on the runtime the caller is running in.
    pub fn new(label: impl Into<String>) -> Result<Self, QueueError> {
        let handle = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;
        Ok(Self::spawn_on(label, &handle))
    }

    /// Spawn a queue on an explicit runtime.
    pub fn spawn_on(label: impl Into<String>, handle: &Handle) -> Self {
        let label: Arc<str> = Arc::from(label.into());
        let id = NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed);
        let flavor = handle.runtime_flavor();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();

        let worker_label = label.clone();
        handle.spawn(async move {
            #[cfg(feature = "tracing")]
            tracing::debug!(queue = %worker_label, "Queue worker started");

            while let Some(task) = receiver.recv().await {
                let previous = CURRENT_QUEUE.replace(id);
                run_task(&worker_label, task);
                CURRENT_QUEUE.set(previous);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(queue = %worker_label, "Queue worker stopped");
        });

        Self {
            label,
            sender,
            id,
            flavor,
        }
    }

    /// Wrap this queue in a shareable [`Queue`] handle.
    pub fn into_queue(self) -> Queue {
        Queue::new(self)
    }
}

impl SerialExecutor for TokioQueue {
    fn execute(&self, task: Task) {
        if self.sender.send(task).is_err() {
            report_dropped(&self.label);
        }
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn is_current(&self) -> bool {
        CURRENT_QUEUE.get() == self.id
    }

    // Runtime ids are unstable in tokio, so any current-thread runtime on
    // the calling thread counts as the worker's.
    fn stalls_blocked_caller(&self) -> bool {
        self.flavor == RuntimeFlavor::CurrentThread
            && Handle::try_current()
                .is_ok_and(|caller| caller.runtime_flavor() == RuntimeFlavor::CurrentThread)
    }
}
