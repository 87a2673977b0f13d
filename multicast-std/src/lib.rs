//! # multicast-std
//!
//! Standard implementations for the multicast delegate dispatcher.
//!
//! This crate provides:
//! - **Serial queues**: [`ThreadQueue`], [`TokioQueue`] (feature `tokio`)
//! - **A shared fallback queue**: [`shared_default_queue`]
//! - **Flushing**: [`flush`], [`flush_blocking`]
//! - **Testing utilities**: [`ManualQueue`], [`CallLog`]
//!
//! [`ThreadQueue`]: queues::ThreadQueue
//! [`TokioQueue`]: queues::TokioQueue
//! [`shared_default_queue`]: queues::shared_default_queue
//! [`ManualQueue`]: testing::ManualQueue
//! [`CallLog`]: testing::CallLog

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use multicast_core;

// Modules
mod flush;
pub mod queues;
pub mod testing;

pub use flush::{flush, flush_blocking};
