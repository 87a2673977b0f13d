//! Serial queue implementations.
//!
//! - [`ThreadQueue`]: one dedicated OS thread per queue.
//! - [`TokioQueue`]: one task on a tokio runtime per queue (feature `tokio`).
//!
//! Both catch a panicking task at the task boundary, log it, and go on with
//! the next task. A panic never reaches the code that enqueued the task.

#[cfg(feature = "tokio")]
mod runtime;
mod thread;

#[cfg(feature = "tokio")]
pub use runtime::TokioQueue;
pub use thread::{ThreadQueue, ThreadQueueBuilder};

use multicast_core::{Queue, QueueError, Task};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::OnceLock,
};

/// Label of the queue returned by [`shared_default_queue`].
pub const DEFAULT_QUEUE_LABEL: &str = "multicast.default";

static SHARED_DEFAULT: OnceLock<Queue> = OnceLock::new();

/// The process-wide fallback queue.
///
/// Spawned on first use and never replaced afterwards. Prefer passing a
/// queue explicitly; this exists for owners that have no queue of their own
/// to offer as a default.
pub fn shared_default_queue() -> Result<Queue, QueueError> {
    if let Some(queue) = SHARED_DEFAULT.get() {
        return Ok(queue.clone());
    }
    let spawned = ThreadQueue::new(DEFAULT_QUEUE_LABEL)?.into_queue();
    // A concurrent caller may have won; its queue is the one everybody sees.
    Ok(SHARED_DEFAULT.get_or_init(|| spawned).clone())
}

/// Run one task, containing any panic it raises.
pub(crate) fn run_task(label: &str, task: Task) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        #[cfg(feature = "tracing")]
        {
            tracing::error!(
                queue = %label,
                panic = %panic_message(payload.as_ref()),
                "Queued task panicked"
            );
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (label, payload); // Suppress unused warnings
        }
    }
}

/// Log a task that could not be enqueued because the worker is gone.
pub(crate) fn report_dropped(label: &str) {
    #[cfg(feature = "tracing")]
    {
        tracing::warn!(queue = %label, "Queue worker has stopped, task dropped");
    }

    #[cfg(not(feature = "tracing"))]
    {
        let _ = label;
    }
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
