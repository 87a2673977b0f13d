//! A serial queue backed by a dedicated OS thread.

use super::{report_dropped, run_task};
use multicast_core::{Queue, QueueError, SerialExecutor, Task};
use std::{
    sync::mpsc,
    thread::{self, ThreadId},
};

/// A serial queue that runs its tasks on its own thread.
///
/// Tasks are handed over through an unbounded channel, so `execute` never
/// blocks. Dropping the queue closes the channel; the worker finishes the
/// tasks it already accepted and then exits.
///
/// # Example
///
/// ```rust
/// use multicast_std::queues::ThreadQueue;
///
/// let queue = ThreadQueue::builder().label("ui").spawn().unwrap().into_queue();
/// queue.dispatch(|| println!("on the ui queue"));
/// multicast_std::flush_blocking(&queue);
/// ```
pub struct ThreadQueue {
    label: String,
    sender: mpsc::Sender<Task>,
    worker: ThreadId,
}

impl ThreadQueue {
    /// Spawn a queue with the given label and default settings.
    pub fn new(label: impl Into<String>) -> Result<Self, QueueError> {
        Self::builder().label(label).spawn()
    }

    /// Start configuring a queue.
    pub fn builder() -> ThreadQueueBuilder {
        ThreadQueueBuilder::default()
    }

    /// Wrap this queue in a shareable [`Queue`] handle.
    pub fn into_queue(self) -> Queue {
        Queue::new(self)
    }
}

impl SerialExecutor for ThreadQueue {
    fn execute(&self, task: Task) {
        if self.sender.send(task).is_err() {
            report_dropped(&self.label);
        }
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn is_current(&self) -> bool {
        thread::current().id() == self.worker
    }
}

/// Builder for [`ThreadQueue`].
#[derive(Debug, Default, Clone)]
pub struct ThreadQueueBuilder {
    label: Option<String>,
    stack_size: Option<usize>,
}

impl ThreadQueueBuilder {
    /// Set the queue label, also used as the worker thread name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the worker thread's stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Spawn the worker thread.
    pub fn spawn(self) -> Result<ThreadQueue, QueueError> {
        let label = self.label.unwrap_or_else(|| "multicast.queue".to_string());
        let (sender, receiver) = mpsc::channel::<Task>();

        let mut builder = thread::Builder::new().name(label.clone());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        let worker_label = label.clone();
        let handle = builder.spawn(move || run_worker(&worker_label, receiver))?;

        Ok(ThreadQueue {
            label,
            sender,
            worker: handle.thread().id(),
        })
    }
}

fn run_worker(label: &str, receiver: mpsc::Receiver<Task>) {
    #[cfg(feature = "tracing")]
    tracing::debug!(queue = %label, "Queue worker started");

    for task in receiver {
        run_task(label, task);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(queue = %label, "Queue worker stopped");
}
