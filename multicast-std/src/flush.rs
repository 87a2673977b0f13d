//! Waiting for a queue to catch up.

use futures::channel::oneshot;
use multicast_core::Queue;
use std::future::Future;

/// Wait until every task the queue accepted before this call has run.
///
/// The marker task is enqueued immediately, when `flush` is called, not when
/// the returned future is first polled. If the queue drops the marker (its
/// worker is gone) the future completes anyway.
pub fn flush(queue: &Queue) -> impl Future<Output = ()> + Send + use<> {
    let (done, finished) = oneshot::channel::<()>();
    queue.dispatch(move || {
        let _ = done.send(());
    });
    async move {
        let _ = finished.await;
    }
}

/// Blocking form of [`flush`].
///
/// Returns immediately when called from a task running on `queue` itself,
/// since waiting there could never finish. Do not call this on a queue that
/// only makes progress when the caller drives it, such as
/// [`ManualQueue`](crate::testing::ManualQueue).
///
/// # Panics
///
/// Panics when the queue reports that blocking the calling thread would
/// stall it, as a tokio-hosted queue does when the caller is itself running
/// on a current-thread runtime. Await [`flush`] there instead.
pub fn flush_blocking(queue: &Queue) {
    if queue.is_current() {
        return;
    }
    assert!(
        !queue.stalls_blocked_caller(),
        "flush_blocking on queue `{}` would never finish: its worker needs the \
         thread this call would block; await `flush` instead",
        queue.label()
    );
    futures::executor::block_on(flush(queue));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queues::ThreadQueue;
    use crate::testing::{CallLog, ManualQueue};
    use std::sync::Arc;

    #[test]
    fn test_flush_waits_for_marker() {
        let manual = Arc::new(ManualQueue::new("manual"));
        let queue = Queue::from(manual.clone());

        let pending = flush(&queue);
        assert_eq!(manual.pending(), 1);
        assert_eq!(manual.run_pending(), 1);

        futures::executor::block_on(pending);
    }

    #[test]
    fn test_flush_completes_when_marker_dropped() {
        let manual = Arc::new(ManualQueue::new("manual"));
        let queue = Queue::from(manual.clone());

        let pending = flush(&queue);
        assert_eq!(manual.clear(), 1);

        futures::executor::block_on(pending);
    }

    #[test]
    fn test_flush_blocking_from_own_task_returns() {
        let queue = ThreadQueue::new("self-flush").unwrap().into_queue();
        let log: CallLog = CallLog::new();

        let (inner, record) = (queue.clone(), log.clone());
        queue.dispatch(move || {
            flush_blocking(&inner);
            record.record("returned");
        });
        flush_blocking(&queue);

        assert_eq!(log.entries(), vec!["returned".to_string()]);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_flush_blocking_thread_queue_inside_current_thread_runtime() {
        let queue = ThreadQueue::new("outside-runtime").unwrap().into_queue();
        let log: CallLog<u32> = CallLog::new();

        let record = log.clone();
        queue.dispatch(move || record.record(1_u32));
        flush_blocking(&queue);

        assert_eq!(log.entries(), vec![1]);
    }
}
