//! # multicast-core
//!
//! Core vocabulary for the multicast delegate dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that defines delegate protocols or custom queues without pulling in the
//! dispatcher itself.
//!
//! - [`Delegate`] / [`Selector`]: what a listener is and which messages it
//!   declares it can handle.
//! - [`SerialExecutor`] / [`Queue`] / [`Task`]: where a listener wants its
//!   callbacks to run.
//! - [`QueueError`]: failures while creating a queue.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod delegate;
mod error;
mod queue;
mod selector;

// Re-exports
pub use delegate::Delegate;
pub use error::QueueError;
pub use queue::{Queue, SerialExecutor, Task};
pub use selector::Selector;
