//! # multicast - Multicast Delegates with Per-Delegate Queues
//!
//! `multicast` lets many independent delegates subscribe to the events of a
//! single producer. The producer makes one call; every delegate that
//! declared interest in that message receives it, asynchronously, on the
//! serial queue the delegate picked when it registered.
//!
//! ## Quick Start
//!
//! ```rust
//! use multicast::{Delegate, MulticastDelegate, Selector, ThreadQueue, selector};
//! use std::sync::Arc;
//!
//! // A delegate protocol is a trait with `Delegate` as a supertrait.
//! pub trait ConnectionDelegate: Delegate {
//!     fn did_connect(&self, _host: &str) {}
//!     fn did_disconnect(&self) {}
//! }
//!
//! struct Status;
//!
//! impl Delegate for Status {
//!     fn responds_to(&self, selector: Selector) -> bool {
//!         selector == multicast::selector!(did_connect)
//!     }
//! }
//!
//! impl ConnectionDelegate for Status {
//!     fn did_connect(&self, host: &str) {
//!         println!("connected to {host}");
//!     }
//! }
//!
//! let main = ThreadQueue::new("main").unwrap().into_queue();
//! let delegates: MulticastDelegate<dyn ConnectionDelegate> = MulticastDelegate::new(main.clone());
//! delegates.add_delegate(Arc::new(Status) as Arc<dyn ConnectionDelegate>);
//!
//! let host = String::from("example.org");
//! delegates.invoke(selector!(did_connect), move |d| d.did_connect(&host));
//! // Nobody responds to `did_disconnect`, so nothing is enqueued.
//! assert_eq!(delegates.invoke(selector!(did_disconnect), |d| d.did_disconnect()), 0);
//!
//! multicast::flush_blocking(&main);
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): debug/trace events for registration changes and
//!   fan-out, error events for panicking tasks
//! - `macros` (default): `#[derive(Delegate)]` with `#[responds_to(...)]`
//! - `tokio`: [`TokioQueue`], a serial queue hosted on a tokio runtime

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatcher;
mod registry;

pub use dispatcher::{MulticastDelegate, MulticastDelegateBuilder};
pub use registry::Registration;

pub use multicast_core::{Delegate, Queue, QueueError, SerialExecutor, Selector, Task, selector};

pub use multicast_std::{
    flush, flush_blocking,
    queues::{DEFAULT_QUEUE_LABEL, ThreadQueue, ThreadQueueBuilder, shared_default_queue},
};

#[cfg(feature = "tokio")]
pub use multicast_std::queues::TokioQueue;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use multicast_std::testing::*;
}

/// Prelude module - common imports for multicast delegates.
///
/// # Usage
///
/// ```rust,ignore
/// use multicast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Delegate, MulticastDelegate, Queue, Selector, SerialExecutor, ThreadQueue, flush,
        flush_blocking, selector,
    };
}

#[cfg(feature = "macros")]
pub use multicast_macros::Delegate;
