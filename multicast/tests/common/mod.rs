#![allow(dead_code)]

use multicast::{
    Delegate, Queue, Selector,
    testing::{CallLog, ManualQueue},
};
use std::sync::Arc;

// ============================================================================
// Test Protocol
// ============================================================================

pub const DID_OPEN: Selector = Selector::new("did_open");
pub const DID_RECEIVE: Selector = Selector::new("did_receive");
pub const DID_CLOSE: Selector = Selector::new("did_close");

pub trait StreamDelegate: Delegate {
    fn did_open(&self) {}
    fn did_receive(&self, _seq: u32) {}
    fn did_close(&self) {}
}

pub type Multicast = multicast::MulticastDelegate<dyn StreamDelegate>;

// ============================================================================
// Test Delegates
// ============================================================================

/// Responds to `did_open` and `did_receive`, recording both.
pub struct Recorder {
    pub name: &'static str,
    pub log: CallLog,
}

impl Recorder {
    pub fn shared(name: &'static str, log: &CallLog) -> Arc<dyn StreamDelegate> {
        Arc::new(Self {
            name,
            log: log.clone(),
        })
    }
}

impl Delegate for Recorder {
    fn responds_to(&self, selector: Selector) -> bool {
        selector == DID_OPEN || selector == DID_RECEIVE
    }
}

impl StreamDelegate for Recorder {
    fn did_open(&self) {
        self.log.record(format!("{}:open", self.name));
    }

    fn did_receive(&self, seq: u32) {
        self.log.record(format!("{}:{}", self.name, seq));
    }
}

/// Only interested in `did_close`.
pub struct Closer {
    pub log: CallLog,
}

impl Delegate for Closer {
    fn responds_to(&self, selector: Selector) -> bool {
        selector == DID_CLOSE
    }
}

impl StreamDelegate for Closer {
    fn did_close(&self) {
        self.log.record("close");
    }
}

/// Responds to nothing.
pub struct Bystander;

impl Delegate for Bystander {
    fn responds_to(&self, _selector: Selector) -> bool {
        false
    }
}

impl StreamDelegate for Bystander {}

// ============================================================================
// Helpers
// ============================================================================

pub fn manual_queue(label: &str) -> (Arc<ManualQueue>, Queue) {
    let manual = Arc::new(ManualQueue::new(label));
    let queue = Queue::from(manual.clone());
    (manual, queue)
}

pub fn shared<T: StreamDelegate>(delegate: T) -> Arc<dyn StreamDelegate> {
    Arc::new(delegate)
}
