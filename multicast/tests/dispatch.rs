//! Fan-out behaviour of `invoke`.

use multicast::{Queue, ThreadQueue, flush, flush_blocking, testing::CallLog};
use std::{
    sync::{Arc, Mutex},
    thread,
};

mod common;
use common::{
    Bystander, Closer, DID_CLOSE, DID_OPEN, DID_RECEIVE, Multicast, Recorder, StreamDelegate,
    manual_queue, shared,
};

#[test]
fn test_no_responder_enqueues_nothing() {
    let (driver, c) = manual_queue("c");
    let multicast = Multicast::new(c);
    multicast.add_delegate(shared(Bystander));

    assert!(!multicast.has_delegate_that_responds_to(DID_CLOSE));
    assert_eq!(multicast.invoke(DID_CLOSE, |d| d.did_close()), 0);
    assert_eq!(driver.pending(), 0);
}

#[test]
fn test_invoke_with_empty_registry() {
    let (driver, c) = manual_queue("c");
    let multicast = Multicast::new(c);

    assert_eq!(multicast.invoke(DID_OPEN, |d| d.did_open()), 0);
    assert_eq!(driver.pending(), 0);
}

#[test]
fn test_fifo_per_queue() {
    let queue = ThreadQueue::new("fifo").unwrap().into_queue();
    let multicast = Multicast::new(queue.clone());
    let log = CallLog::new();
    multicast.add_delegate(Recorder::shared("r", &log));

    for seq in 1..=3 {
        multicast.invoke(DID_RECEIVE, move |d| d.did_receive(seq));
    }
    flush_blocking(&queue);

    assert_eq!(log.entries(), vec!["r:1", "r:2", "r:3"]);
}

#[test]
fn test_invoke_does_not_wait_for_delivery() {
    let (driver, c) = manual_queue("c");
    let multicast = Multicast::new(c);
    let log = CallLog::new();
    multicast.add_delegate(Recorder::shared("r", &log));

    assert_eq!(multicast.invoke(DID_OPEN, |d| d.did_open()), 1);
    assert!(log.is_empty());

    driver.run_pending();
    assert_eq!(log.entries(), vec!["r:open"]);
}

#[test]
fn test_only_responders_receive() {
    let (driver, c) = manual_queue("c");
    let multicast = Multicast::new(c);
    let log = CallLog::new();

    multicast.add_delegate(Recorder::shared("r", &log));
    multicast.add_delegate(shared(Closer { log: log.clone() }));
    multicast.add_delegate(shared(Bystander));

    assert_eq!(multicast.invoke(DID_CLOSE, |d| d.did_close()), 1);
    assert_eq!(multicast.invoke(DID_RECEIVE, |d| d.did_receive(9)), 1);
    driver.run_pending();

    assert_eq!(log.entries(), vec!["close", "r:9"]);
}

#[test]
fn test_delivery_runs_on_registered_queue() {
    let first = ThreadQueue::new("first").unwrap().into_queue();
    let second = ThreadQueue::new("second").unwrap().into_queue();
    let multicast = Multicast::new(first.clone());
    let seen = Arc::new(Mutex::new(Vec::new()));

    for queue in [&first, &second] {
        let probe = Probe {
            queue: queue.clone(),
            seen: seen.clone(),
        };
        multicast.add_delegate_on(shared(probe), queue);
    }

    assert_eq!(multicast.invoke(DID_OPEN, |d| d.did_open()), 2);
    flush_blocking(&first);
    flush_blocking(&second);

    assert!(!first.is_current());
    assert_eq!(*seen.lock().unwrap(), vec![true, true]);
}

struct Probe {
    queue: Queue,
    seen: Arc<Mutex<Vec<bool>>>,
}

impl multicast::Delegate for Probe {
    fn responds_to(&self, selector: multicast::Selector) -> bool {
        selector == DID_OPEN
    }
}

impl StreamDelegate for Probe {
    fn did_open(&self) {
        self.seen.lock().unwrap().push(self.queue.is_current());
    }
}

#[test]
fn test_removed_delegate_still_gets_enqueued_delivery() {
    let (driver, c) = manual_queue("c");
    let multicast = Multicast::new(c);
    let log = CallLog::new();
    let listener = Recorder::shared("r", &log);
    multicast.add_delegate(listener.clone());

    assert_eq!(multicast.invoke(DID_RECEIVE, |d| d.did_receive(1)), 1);
    multicast.remove_delegate(&listener);
    assert_eq!(multicast.invoke(DID_RECEIVE, |d| d.did_receive(2)), 0);

    driver.run_pending();
    assert_eq!(log.entries(), vec!["r:1"]);
}

#[test]
fn test_added_after_invoke_misses_earlier_message() {
    let (driver, c) = manual_queue("c");
    let multicast = Multicast::new(c);
    let log = CallLog::new();

    multicast.add_delegate(Recorder::shared("early", &log));
    multicast.invoke(DID_RECEIVE, |d| d.did_receive(1));
    multicast.add_delegate(Recorder::shared("late", &log));
    multicast.invoke(DID_RECEIVE, |d| d.did_receive(2));
    driver.run_pending();

    assert_eq!(log.entries(), vec!["early:1", "early:2", "late:2"]);
}

#[test]
fn test_panicking_delegate_does_not_reach_producer() {
    let queue = ThreadQueue::new("panics").unwrap().into_queue();
    let multicast = Multicast::new(queue.clone());
    let log = CallLog::new();

    multicast.add_delegate(shared(Exploder));
    multicast.add_delegate(Recorder::shared("r", &log));

    assert_eq!(multicast.invoke(DID_RECEIVE, |d| d.did_receive(5)), 2);
    flush_blocking(&queue);

    assert_eq!(log.entries(), vec!["r:5"]);
}

struct Exploder;

impl multicast::Delegate for Exploder {
    fn responds_to(&self, selector: multicast::Selector) -> bool {
        selector == DID_RECEIVE
    }
}

impl StreamDelegate for Exploder {
    fn did_receive(&self, _seq: u32) {
        panic!("delegate failure");
    }
}

#[test]
fn test_delegate_may_mutate_dispatcher_during_delivery() {
    let queue = ThreadQueue::new("reentrant").unwrap().into_queue();
    let multicast = Arc::new(Multicast::new(queue.clone()));
    let log = CallLog::new();
    let listener = Recorder::shared("r", &log);
    multicast.add_delegate(listener.clone());

    let handle = multicast.clone();
    multicast.invoke(DID_RECEIVE, move |d| {
        d.did_receive(1);
        handle.remove_delegate(&listener);
        handle.invoke(DID_RECEIVE, |d| d.did_receive(2));
    });
    flush_blocking(&queue);

    assert_eq!(log.entries(), vec!["r:1"]);
    assert!(multicast.is_empty());
}

#[test]
fn test_independent_queues_each_keep_order() {
    let first = ThreadQueue::new("first").unwrap().into_queue();
    let second = ThreadQueue::new("second").unwrap().into_queue();
    let multicast = Multicast::new(first.clone());
    let a_log = CallLog::new();
    let b_log = CallLog::new();

    multicast.add_delegate_on(Recorder::shared("a", &a_log), &first);
    multicast.add_delegate_on(Recorder::shared("b", &b_log), &second);

    for seq in 0..20 {
        multicast.invoke(DID_RECEIVE, move |d| d.did_receive(seq));
    }
    flush_blocking(&first);
    flush_blocking(&second);

    let expected_a: Vec<String> = (0..20).map(|i| format!("a:{i}")).collect();
    let expected_b: Vec<String> = (0..20).map(|i| format!("b:{i}")).collect();
    assert_eq!(a_log.entries(), expected_a);
    assert_eq!(b_log.entries(), expected_b);
}

#[tokio::test]
async fn test_async_flush_from_runtime() {
    let queue = ThreadQueue::new("async").unwrap().into_queue();
    let multicast = Multicast::new(queue.clone());
    let log = CallLog::new();
    multicast.add_delegate(Recorder::shared("r", &log));

    let producer = thread::spawn({
        let multicast = Arc::new(multicast);
        move || {
            multicast.invoke(DID_OPEN, |d| d.did_open());
        }
    });
    producer.join().unwrap();
    flush(&queue).await;

    assert_eq!(log.entries(), vec!["r:open"]);
}
